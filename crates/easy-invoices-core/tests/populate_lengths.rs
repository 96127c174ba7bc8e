//! List lengths requested during interactive population are honoured
//! whatever the starting length.

use easy_invoices_core::{walk, Catalog, Options, Populate, Record, ScriptedPrompt, Taxes};

fn options_with(n: usize) -> Options {
    Options {
        id: "std".to_string(),
        taxes: (0..n)
            .map(|i| Taxes {
                kind: format!("T{i}"),
                percent: i as i64,
            })
            .collect(),
        ..Options::default()
    }
}

/// Keep every scalar, ask for three taxes, keep every tax field.
fn populate_three(start: usize) -> Options {
    let catalog = Catalog::global().unwrap();
    let record = Record::from_typed(catalog, &options_with(start)).unwrap();
    let mut answers = vec!["", "", "", "3"];
    answers.extend(["", "", "", "", "", ""]);
    let mut prompt = ScriptedPrompt::with_answers(answers);

    let walked = walk(catalog, &record, &mut Populate::new(&mut prompt)).unwrap();
    assert_eq!(prompt.remaining_answers(), 0);
    walked.to_typed(catalog).unwrap()
}

#[test]
fn grows_empty_list_to_three() {
    let options = populate_three(0);
    assert_eq!(options.taxes, vec![Taxes::default(); 3]);
}

#[test]
fn grows_single_item_list_to_three() {
    let options = populate_three(1);
    assert_eq!(options.taxes[0].kind, "T0");
    assert_eq!(options.taxes[1], Taxes::default());
    assert_eq!(options.taxes[2], Taxes::default());
}

#[test]
fn shrinks_long_list_to_three() {
    let options = populate_three(5);
    let kinds: Vec<_> = options.taxes.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, ["T0", "T1", "T2"]);
}
