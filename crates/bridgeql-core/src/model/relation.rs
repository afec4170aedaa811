use crate::model::{attribute::OwnedAttribute, entity::EntityModel};
use serde::{Deserialize, Serialize};

///
/// RoleModel
///
/// One named slot in a relation: the field callers traverse by, the emitted
/// role label, and the accepted player registries in declaration order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoleModel {
    field: String,
    label: String,
    players: Vec<EntityModel>,
}

impl RoleModel {
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>, player: EntityModel) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            players: vec![player],
        }
    }

    /// Accept an additional player type.
    #[must_use]
    pub fn player(mut self, player: EntityModel) -> Self {
        self.players.push(player);
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The emitted role label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn players(&self) -> &[EntityModel] {
        &self.players
    }

    /// Resolve an attribute field against the accepted players, first
    /// declared player wins.
    #[must_use]
    pub fn player_attribute(&self, field: &str) -> Option<&OwnedAttribute> {
        self.players.iter().find_map(|player| player.owned(field))
    }

    /// Match fragment tying the relation variable to this role's player
    /// variable. The player variable is the role field name, never the
    /// owner prefix, so player attribute variables cannot collide with
    /// relation-level ones.
    #[must_use]
    pub fn link_fragment(&self, owner: &str) -> String {
        format!(
            "${owner} links ({label}: ${player})",
            label = self.label,
            player = self.field,
        )
    }
}

///
/// RelationModel
///
/// Relation registry: the entity surface (owned attributes) plus ordered
/// roles. Role fields and attribute fields share one resolution namespace;
/// attributes are checked first, mirroring lookup order in the compiler.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationModel {
    entity: EntityModel,
    roles: Vec<RoleModel>,
}

impl RelationModel {
    #[must_use]
    pub fn new(ident: &str) -> Self {
        Self {
            entity: EntityModel::new(ident),
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            entity: EntityModel::named(name),
            roles: Vec::new(),
        }
    }

    /// Append one ownership entry on the relation itself.
    #[must_use]
    pub fn own(mut self, owned: OwnedAttribute) -> Self {
        self.entity = self.entity.own(owned);
        self
    }

    /// Append one role.
    #[must_use]
    pub fn role(mut self, role: RoleModel) -> Self {
        self.roles.push(role);
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.entity.type_name()
    }

    /// The relation's own attribute registry.
    #[must_use]
    pub const fn entity(&self) -> &EntityModel {
        &self.entity
    }

    #[must_use]
    pub fn roles(&self) -> &[RoleModel] {
        &self.roles
    }

    /// Resolve one role by its traversal field.
    #[must_use]
    pub fn find_role(&self, field: &str) -> Option<&RoleModel> {
        self.roles.iter().find(|role| role.field() == field)
    }

    /// Role field names in declaration order, for error listings.
    #[must_use]
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(RoleModel::field).collect()
    }
}
