//! Name and type codecs
//!
//! Pure, stateless translation between native connector names and canonical
//! qualified names. Both codecs are functions of their input plus the
//! resource namespace; neither keeps a lookup table.

pub mod attribute;
pub mod object_class;

pub use attribute::AttributeCodec;
pub use object_class::{
    ObjectClassCodec, ACCOUNT_OBJECTCLASS_LOCAL_NAME, CUSTOM_OBJECTCLASS_PREFIX,
    CUSTOM_OBJECTCLASS_SUFFIX, GROUP_OBJECTCLASS_LOCAL_NAME,
};
