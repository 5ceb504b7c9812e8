pub mod applicationdb;
pub mod contractdb;
pub mod db;
pub mod memory;
pub mod paymentdb;
pub mod projectdb;
pub mod query_timeout;
pub mod reviewdb;
pub mod skilldb;
pub mod studentdb;


pub use applicationdb::ApplicationExt;
pub use contractdb::ContractExt;
pub use db::DBClient;
pub use memory::MemoryStore;
pub use paymentdb::PaymentExt;
pub use projectdb::ProjectExt;
pub use reviewdb::ReviewExt;
pub use skilldb::SkillExt;
pub use studentdb::StudentExt;

/// Everything the services need from persistence. Implemented by the
/// Postgres client and by the in-memory store.
pub trait MarketplaceStore:
    StudentExt
    + ProjectExt
    + ApplicationExt
    + ContractExt
    + ReviewExt
    + PaymentExt
    + SkillExt
    + Send
    + Sync
    + std::fmt::Debug
{
}

impl<T> MarketplaceStore for T where
    T: StudentExt
        + ProjectExt
        + ApplicationExt
        + ContractExt
        + ReviewExt
        + PaymentExt
        + SkillExt
        + Send
        + Sync
        + std::fmt::Debug
{
}
