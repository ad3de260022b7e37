mod order;
pub use order::{Direction, OrderTerm};

mod predicate;
pub use predicate::{CmpOp, Predicate};

mod record;
pub use record::Record;

mod ty;
pub use ty::FieldType;

mod value;
pub use value::Value;
