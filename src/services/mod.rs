/// "Time's up" tone cue and vibration.
pub mod alert;
/// Generic game session controller.
pub mod controller;
/// Persisted display and timer preferences.
pub mod preferences;
/// Transient, auto-dismissing user messages.
pub mod toast;
