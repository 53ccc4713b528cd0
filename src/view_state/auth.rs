use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::services::{Lifetime, Navigator, Services, TaskHandle, Toast};
use crate::session::SessionState;

/// What a screen that needs a signed-in user may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGate {
    /// Session still loading; show a placeholder and take no input.
    Loading,
    /// Loaded, nobody signed in.
    LoginRequired,
    Ready,
}

impl AuthGate {
    pub fn from_session(session: &SessionState) -> Self {
        if session.loading {
            AuthGate::Loading
        } else if session.user.is_none() {
            AuthGate::LoginRequired
        } else {
            AuthGate::Ready
        }
    }
}

pub fn unauthorized_toast() -> Toast {
    Toast::error("Unauthorized", "You are logged out. Logging in again...")
}

/// Redirects scheduled by one view, cancelled together when the view goes away.
#[derive(Default)]
pub struct PendingRedirects(RefCell<Vec<TaskHandle>>);

impl PendingRedirects {
    pub fn push(&self, handle: TaskHandle) {
        self.0.borrow_mut().push(handle);
    }

    pub fn cancel_all(&self) {
        let handles: Vec<TaskHandle> = self.0.borrow_mut().drain(..).collect();
        for handle in handles {
            handle.cancel();
        }
    }
}

/// The standard reaction to a lost session: toast now, send the browser to the
/// login page after the configured delay so the toast gets a chance to render.
pub fn react_to_unauthorized<C>(services: &Services<C>, lifetime: &Lifetime, pending: &PendingRedirects) {
    services.toasts.show(unauthorized_toast());

    let navigator: Rc<dyn Navigator> = Rc::clone(&services.navigator);
    let login_path = services.config.login_path.clone();
    let lifetime = lifetime.clone();
    let handle = services.scheduler.schedule(
        services.config.auth_redirect_delay(),
        Box::new(move || {
            if lifetime.is_alive() {
                info!("Session expired, redirecting to {}", login_path);
                navigator.redirect(&login_path);
            }
        }),
    );
    pending.push(handle);
}
