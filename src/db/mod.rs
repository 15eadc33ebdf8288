mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use models::{
    Asset, AssetInput, AssetKind, EmailStatus, EngagementSample, GeneratedEmail,
    GeneratedEmailInput, Lead, LeadEngagement, LeadInput, LeadStage, Report, ReportEngagement,
    ReportInput, Temperature, ViewerEngagement,
};
