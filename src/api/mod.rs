mod session;
mod state;

pub use session::{AuthenticatedSession, CurrentSession, SESSION_HEADER};
pub use state::AppState;
