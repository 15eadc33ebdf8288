pub mod asset;
pub mod email;
pub mod engagement;
pub mod lead;
pub mod report;

pub use asset::{Asset, AssetInput, AssetKind};
pub use email::{EmailStatus, GeneratedEmail, GeneratedEmailInput};
pub use engagement::{EngagementSample, LeadEngagement, ViewerEngagement};
pub use lead::{Lead, LeadInput, LeadOverview, LeadStage, Temperature};
pub use report::{Report, ReportEngagement, ReportInput};
