mod session;

pub use session::SessionGate;
