pub mod homepage;
pub mod junctions;
pub mod lab_member;
pub mod lab_setting;
pub mod news;
pub mod project;
pub mod publication;
pub mod user;

pub use homepage::HomepageSection;
pub use junctions::{ProjectMember, ProjectPublication, PublicationAuthor};
pub use lab_member::{LabMember, LabMemberRole};
pub use lab_setting::LabSetting;
pub use news::News;
pub use project::{Project, ProjectStatus, ProjectWithRelations};
pub use publication::{Publication, PublicationWithAuthors};
pub use user::{User, UserRole, UserWithPassword};
