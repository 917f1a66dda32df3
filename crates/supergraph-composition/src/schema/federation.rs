use crate::field_set::FieldSet;
use indexmap::IndexMap;

/// Which service owns which type and field of a composed schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FederationMetadata {
    types: IndexMap<String, TypeFederation>,
}

impl FederationMetadata {
    pub fn get_type(&self, type_name: &str) -> Option<&TypeFederation> {
        self.types.get(type_name)
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeFederation)> {
        self.types.iter().map(|(name, metadata)| (name.as_str(), metadata))
    }

    /// The service resolving `type_name.field_name`.
    pub fn field_owner(&self, type_name: &str, field_name: &str) -> Option<&str> {
        self.types
            .get(type_name)
            .and_then(|metadata| metadata.fields.get(field_name))
            .and_then(FieldFederation::owner)
            .map(|contribution| contribution.service.as_str())
    }

    pub(crate) fn insert(&mut self, type_name: String, metadata: TypeFederation) {
        self.types.insert(type_name, metadata);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeFederation {
    /// The service holding the base definition of the type. `None` for value types and types
    /// only extended.
    pub owner: Option<String>,
    /// Defined identically by more than one service.
    pub is_value_type: bool,
    /// `@key` field sets, by declaring service, in service order.
    pub keys: Vec<(String, FieldSet)>,
    /// Per field of an object or interface type, the services declaring it.
    pub fields: IndexMap<String, FieldFederation>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldFederation {
    /// In service order.
    pub contributions: Vec<FieldContribution>,
}

impl FieldFederation {
    /// The first service declaring the field without `@external`.
    pub fn owner(&self) -> Option<&FieldContribution> {
        self.contributions.iter().find(|contribution| !contribution.is_external)
    }
}

/// One service's declaration of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldContribution {
    pub service: String,
    pub is_external: bool,
    pub requires: Option<FieldSet>,
    pub provides: Option<FieldSet>,
}
