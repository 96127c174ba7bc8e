//! Foreign-key resolution for records that reference other stored records.
//!
//! Each foreign key is resolved by stepping a [`ResolveState`] machine:
//!
//! ```text
//! Prompt -> CheckExists -> Accept
//!                       -> ConfirmCreate -> RunCreate -> Accept
//!                                        -> Prompt (declined)
//! ```
//!
//! A created record is populated with [`Populate`](super::Populate) only, so
//! the recursion is at most two records deep.

use tracing::debug;

use super::populate::{ask_id, ask_length, ask_scalar, is_record_id, reject};
use crate::catalog::RecordKind;
use crate::domain::{InvoiceError, Result};
use crate::obs;
use crate::record::{FieldPath, FieldValue, Scalar};
use crate::schema::ScalarKind;
use crate::session::Session;
use crate::traverse::Visitor;

/// Step of the resolution of one foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    /// Ask the operator for an id.
    Prompt,
    /// Check whether the entered id is stored.
    CheckExists(String),
    /// The id is missing; offer to create it.
    ConfirmCreate(String),
    /// Run the create workflow for the referenced type.
    RunCreate(String),
    /// Final: the field takes this id.
    Accept { id: String, origin: Origin },
}

/// Where an accepted id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Existing,
    Created,
}

/// Outcome of resolving one foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub field: &'static str,
    pub kind: RecordKind,
    pub id: String,
    pub origin: Origin,
    /// Creation offers the operator turned down before accepting.
    pub declined: u32,
}

/// Visitor that populates a referencing record and guarantees every foreign
/// key names a stored record when the walk completes.
pub struct ReferenceResolver<'s, 'a> {
    session: &'s mut Session<'a>,
    owner: RecordKind,
    resolutions: Vec<Resolution>,
}

impl<'s, 'a> ReferenceResolver<'s, 'a> {
    pub fn new(session: &'s mut Session<'a>, owner: RecordKind) -> Self {
        Self {
            session,
            owner,
            resolutions: Vec::new(),
        }
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn into_resolutions(self) -> Vec<Resolution> {
        self.resolutions
    }

    fn resolve(&mut self, field: &'static str, target: RecordKind, current: &str) -> Result<Resolution> {
        let mut state = ResolveState::Prompt;
        let mut declined = 0;
        loop {
            debug!(field = field, state = ?state, "resolve step");
            state = match state {
                ResolveState::Prompt => {
                    ResolveState::CheckExists(self.session.prompt.ask(field, current)?)
                }
                ResolveState::CheckExists(id) => match self.session.store.exists(target, &id) {
                    Ok(true) => ResolveState::Accept {
                        id,
                        origin: Origin::Existing,
                    },
                    Ok(false) => ResolveState::ConfirmCreate(id),
                    Err(InvoiceError::Validation(err)) => {
                        reject(&mut *self.session.prompt, err);
                        ResolveState::Prompt
                    }
                    Err(err) => return Err(err),
                },
                ResolveState::ConfirmCreate(id) => {
                    let label = format!(
                        "no {} with id '{id}' found. would you like to create it?",
                        target.tag()
                    );
                    if self.session.prompt.confirm(&label, true)? {
                        ResolveState::RunCreate(id)
                    } else {
                        declined += 1;
                        ResolveState::Prompt
                    }
                }
                ResolveState::RunCreate(id) => {
                    let created = self.session.create_populated(target, &id)?;
                    obs::emit_reference_created(field, target, &created);
                    ResolveState::Accept {
                        id: created,
                        origin: Origin::Created,
                    }
                }
                ResolveState::Accept { id, origin } => {
                    return Ok(Resolution {
                        field,
                        kind: target,
                        id,
                        origin,
                        declined,
                    })
                }
            };
        }
    }
}

impl Visitor for ReferenceResolver<'_, '_> {
    fn leaf(&mut self, path: &FieldPath, kind: ScalarKind, current: &Scalar) -> Result<Scalar> {
        let target = if path.is_top_level() {
            self.session
                .catalog
                .reference_target(self.owner, path.name())
        } else {
            None
        };
        match target {
            Some(target) => {
                let resolution = self.resolve(path.name(), target, &current.to_string())?;
                let id = resolution.id.clone();
                self.resolutions.push(resolution);
                Ok(Scalar::Str(id))
            }
            None if is_record_id(path) => ask_id(&mut *self.session.prompt, current),
            None => ask_scalar(&mut *self.session.prompt, &path.to_string(), kind, current),
        }
    }

    fn list_length(&mut self, path: &FieldPath, current: &[FieldValue]) -> Result<i64> {
        ask_length(&mut *self.session.prompt, path, current)
    }
}
