//! Interactive population: every leaf and list length is asked for.

use tracing::debug;

use crate::domain::{InvoiceError, Result, ValidationError};
use crate::prompt::Prompt;
use crate::record::{FieldPath, FieldValue, Scalar};
use crate::schema::ScalarKind;
use crate::store::validate_id;
use crate::traverse::{Visitor, MAX_LIST_LENGTH};

/// Asks the operator for each field, offering the current value as default.
///
/// Unparsable answers are reported and asked again; they never reach the
/// walk.
pub struct Populate<'p> {
    prompt: &'p mut dyn Prompt,
}

impl<'p> Populate<'p> {
    pub fn new(prompt: &'p mut dyn Prompt) -> Self {
        Self { prompt }
    }
}

impl Visitor for Populate<'_> {
    fn leaf(&mut self, path: &FieldPath, kind: ScalarKind, current: &Scalar) -> Result<Scalar> {
        if is_record_id(path) {
            return ask_id(&mut *self.prompt, current);
        }
        ask_scalar(&mut *self.prompt, &path.to_string(), kind, current)
    }

    fn list_length(&mut self, path: &FieldPath, current: &[FieldValue]) -> Result<i64> {
        ask_length(&mut *self.prompt, path, current)
    }
}

/// Ask for a scalar until the answer parses as `kind`.
pub(crate) fn ask_scalar(
    prompt: &mut dyn Prompt,
    label: &str,
    kind: ScalarKind,
    current: &Scalar,
) -> Result<Scalar> {
    loop {
        let answer = prompt.ask(label, &current.to_string())?;
        match kind.parse(label, &answer) {
            Ok(value) => return Ok(value),
            Err(err) => reject(prompt, err),
        }
    }
}

/// The storage key of the record being walked.
pub(crate) fn is_record_id(path: &FieldPath) -> bool {
    path.is_top_level() && path.name() == "id"
}

/// Ask for a record id until it can be used as a storage key.
pub(crate) fn ask_id(prompt: &mut dyn Prompt, current: &Scalar) -> Result<Scalar> {
    loop {
        let answer = prompt.ask("id", &current.to_string())?;
        match validate_id(&answer) {
            Ok(()) => return Ok(Scalar::Str(answer)),
            Err(err) => reject(prompt, err),
        }
    }
}

/// Ask for a list length until the answer is an integer in
/// `0..=MAX_LIST_LENGTH`.
pub(crate) fn ask_length(
    prompt: &mut dyn Prompt,
    path: &FieldPath,
    current: &[FieldValue],
) -> Result<i64> {
    let label = format!("How many '{path}' would you like to define?");
    loop {
        let answer = prompt.ask(&label, &current.len().to_string())?;
        match answer.trim().parse::<i64>() {
            Ok(length) if (0..=MAX_LIST_LENGTH as i64).contains(&length) => return Ok(length),
            Ok(length) if length > 0 => reject(
                prompt,
                ValidationError::ListTooLong {
                    path: path.to_string(),
                    length,
                    max: MAX_LIST_LENGTH,
                },
            ),
            Ok(length) => reject(
                prompt,
                ValidationError::NegativeLength {
                    path: path.to_string(),
                    length,
                },
            ),
            Err(_) => reject(
                prompt,
                ValidationError::NotAnInteger {
                    path: path.to_string(),
                    input: answer,
                },
            ),
        }
    }
}

pub(crate) fn reject(prompt: &mut dyn Prompt, err: ValidationError) {
    debug!(error = %err, "rejected input");
    prompt.notify(&InvoiceError::from(err).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, RecordKind};
    use crate::model::{Options, PaymentTerms, Taxes};
    use crate::prompt::ScriptedPrompt;
    use crate::record::Record;
    use crate::traverse::walk;

    #[test]
    fn test_populate_options_with_retries() {
        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Options);
        let mut prompt = ScriptedPrompt::with_answers([
            "consulting", // id
            "weekly",     // payment_terms: rejected
            "net30",      // payment_terms
            "",           // rate: keep 0
            "-1",         // taxes length: rejected
            "one",        // taxes length: rejected
            "1",          // taxes length
            "GST",        // taxes[0].type
            "5",          // taxes[0].percent
        ]);

        let populated = walk(&catalog, &record, &mut Populate::new(&mut prompt)).unwrap();
        let options: Options = populated.to_typed(&catalog).unwrap();

        assert_eq!(options.id, "consulting");
        assert_eq!(options.payment_terms, PaymentTerms::Net30);
        assert_eq!(options.rate, 0.0);
        assert_eq!(
            options.taxes,
            vec![Taxes {
                kind: "GST".to_string(),
                percent: 5
            }]
        );
        assert_eq!(prompt.notices.len(), 3);
        assert_eq!(prompt.remaining_answers(), 0);
        assert!(prompt.asked.contains(&"taxes[0].percent".to_string()));
    }

    #[test]
    fn test_oversized_length_is_asked_again() {
        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Options);
        let mut prompt =
            ScriptedPrompt::with_answers(["", "", "", "1000000000000000000", "0"]);

        let populated = walk(&catalog, &record, &mut Populate::new(&mut prompt)).unwrap();
        let options: Options = populated.to_typed(&catalog).unwrap();

        assert!(options.taxes.is_empty());
        assert_eq!(prompt.notices.len(), 1);
        assert!(prompt.notices[0].contains("at most 1000 items"));
    }

    #[test]
    fn test_unusable_id_is_asked_again() {
        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Preset);
        let mut prompt = ScriptedPrompt::with_answers(["a/b", "..", "q3", "", "", ""]);

        let populated = walk(&catalog, &record, &mut Populate::new(&mut prompt)).unwrap();

        assert_eq!(populated.id(), Some("q3"));
        assert_eq!(prompt.notices.len(), 2);
        assert_eq!(prompt.asked[..3], ["id", "id", "id"]);
    }

    #[test]
    fn test_existing_items_are_offered_as_defaults() {
        let catalog = Catalog::build().unwrap();
        let options = Options {
            taxes: vec![
                Taxes {
                    kind: "GST".to_string(),
                    percent: 5,
                },
                Taxes {
                    kind: "PST".to_string(),
                    percent: 7,
                },
            ],
            ..Options::default()
        };
        let record = Record::from_typed(&catalog, &options).unwrap();
        // Keep everything, then grow taxes to three and only fill the new one.
        let mut prompt =
            ScriptedPrompt::with_answers(["", "", "", "3", "", "", "", "", "HST", "13"]);

        let populated = walk(&catalog, &record, &mut Populate::new(&mut prompt)).unwrap();
        let result: Options = populated.to_typed(&catalog).unwrap();

        let kinds: Vec<_> = result.taxes.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, ["GST", "PST", "HST"]);
        assert_eq!(result.taxes[1].percent, 7);
        assert_eq!(result.taxes[2].percent, 13);
    }
}
