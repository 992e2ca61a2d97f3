//! Login redirect port

/// Signal telling the host application to send the user back to login.
///
/// Fired once per terminal authentication failure, after credentials were
/// cleared.
pub trait LoginRedirect: Send + Sync {
    /// The session is over; show the login screen.
    fn login_required(&self);
}

impl<F> LoginRedirect for F
where
    F: Fn() + Send + Sync,
{
    fn login_required(&self) {
        self();
    }
}
