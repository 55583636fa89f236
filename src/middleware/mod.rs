pub mod acting_member;
pub mod request_id;

pub use acting_member::ActingMember;
pub use request_id::{assign_request_id, make_span_with_request_id, RequestId};
