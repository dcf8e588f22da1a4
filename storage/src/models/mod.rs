mod audit_entry;
mod session_record;

pub use audit_entry::AuditEntry;
pub use session_record::SessionRecord;
