pub mod adv;
pub mod profile;
pub mod record;
pub mod snapshot;
