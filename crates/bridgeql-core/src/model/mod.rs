mod attribute;
mod entity;
mod relation;


pub use attribute::{AttributeModel, OwnedAttribute};
pub use entity::EntityModel;
pub use relation::{RelationModel, RoleModel};

// re-export so registry construction reads in one import
pub use crate::value::ValueKind;
