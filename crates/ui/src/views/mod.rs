mod question;
mod review;
mod setup;
mod wizard;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use question::{AwaitingScreen, QuestionScreen};
pub use review::ReviewScreen;
pub use setup::SetupScreen;
pub use wizard::WizardView;
