//! EduMesh data model
//!
//! Plain serde records mirroring the backend's JSON (camelCase on the wire).
//! All entities are server-owned; the client only caches copies.

mod job;
mod mentorship;
mod plugin;
mod skill_exchange;
mod user;

pub use job::{
    ApplicationStatus, ApplyRequest, CreateJobRequest, Job, JobApplication, JobFilters, JobStatus,
    JobType, UpdateJobRequest,
};
pub use mentorship::{
    BecomeMentorRequest, Mentor, MentorFilters, MentorshipRequest, RequestStatus, Review,
    ReviewRequest, SendMentorshipRequest, UpdateMentorRequest,
};
pub use plugin::{MarketplacePlugin, Plugin, RegisterPluginRequest};
pub use skill_exchange::{
    CreateSkillExchangeRequest, ExchangeStatus, RespondToExchangeRequest, SkillExchange,
    SkillExchangeFilters, SkillExchangeResponse, UpdateSkillExchangeRequest,
};
pub use user::{
    AuthPayload, Education, Experience, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, UpdateProfileRequest, User, VerifyEmailRequest,
};
