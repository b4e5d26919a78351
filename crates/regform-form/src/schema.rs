//! Declarative form field schema.

use regform_model::FieldState;

/// One declared form field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    name: String,
    required: bool,
    cascaded: bool,
}

impl FieldDecl {
    /// A plain input field: visible and enabled from the start.
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            cascaded: false,
        }
    }

    /// A cascaded select: hidden and disabled until its hierarchy node
    /// resolves.
    pub fn cascaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            cascaded: true,
        }
    }

    /// Mark the field as required. Invisible fields are still excluded
    /// from required checks at validation time.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_cascaded(&self) -> bool {
        self.cascaded
    }

    fn initial_state(&self) -> FieldState {
        if self.cascaded {
            FieldState::cascaded()
        } else {
            FieldState::input()
        }
    }
}

/// The set of fields one form instance declares.
///
/// Every field the form will ever touch must be declared here; the
/// store is created from this schema and rejects unknown names loudly.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldDecl>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    /// The standard event-registration form: contact fields plus both
    /// cascaded hierarchies.
    pub fn standard() -> Self {
        Self::new()
            .field(FieldDecl::input("firstName").required())
            .field(FieldDecl::input("lastName").required())
            .field(FieldDecl::input("email").required())
            .field(FieldDecl::input("phone"))
            .field(FieldDecl::input("attendeeType").required())
            .field(FieldDecl::cascaded("academicLevel"))
            .field(FieldDecl::cascaded("faculty"))
            .field(FieldDecl::cascaded("program"))
            .field(FieldDecl::cascaded("admissionPeriod"))
            .field(FieldDecl::cascaded("country"))
            .field(FieldDecl::cascaded("department"))
            .field(FieldDecl::cascaded("city"))
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|decl| decl.name == name)
    }

    /// Initial `(name, state)` pairs for store construction.
    pub fn initial_states(&self) -> impl Iterator<Item = (String, FieldState)> + '_ {
        self.fields
            .iter()
            .map(|decl| (decl.name.clone(), decl.initial_state()))
    }
}
