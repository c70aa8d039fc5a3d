//! End-to-end tests for the full clean → convert → validate pipeline.

use std::rc::Rc;

use promptline::{
    in_all, pick_from_table, process_value, CapStyle, CapitalizeCleaner, CapturingReporter,
    ChoiceCleaner, Cleaner, CommandOutcome, CommandSet, IntConvertor, LengthValidator,
    ListConvertor, ListValidator, LookupMode, MockTerminal, NoneOfValidator, PasswordValidator,
    Prompt, PromptError, RangeValidator, RegexValidator, ReturnMode, SilentReporter, StripCleaner,
    TableCell, TableEntry, Validator, YesNoConvertor, DEFAULT_CONVERTOR_ERROR,
    DEFAULT_VALIDATOR_ERROR,
};

fn silent() -> Rc<SilentReporter> {
    Rc::new(SilentReporter)
}

#[test]
fn full_pipeline_with_retry() {
    // Strip + complete a choice, convert to int via a table-free pipeline.
    let mut term = MockTerminal::with_responses(["  twelve  ", " 12 "]);
    let mut prompt = Prompt::new(IntConvertor::new())
        .prompt("Count")
        .reporter(silent())
        .cleaner(StripCleaner::default())
        .validator(RangeValidator::new(Some(1), Some(100)));
    assert_eq!(prompt.get(&mut term).unwrap(), Some(12));
    // The prompt was rendered before each attempt.
    assert_eq!(term.output().matches("Count: ").count(), 2);
}

#[test]
fn process_value_reuses_the_pipeline_without_a_terminal() {
    let cleaners: Vec<Box<dyn Cleaner>> = vec![
        Box::new(StripCleaner::default()),
        Box::new(CapitalizeCleaner::new(CapStyle::Lower)),
    ];
    let validators: Vec<Box<dyn Validator<String>>> = vec![Box::new(
        RegexValidator::new("^[a-z]+$").unwrap().describe("word"),
    )];

    let value = process_value(
        "  HELLO  ",
        &cleaners,
        &promptline::IdentityConvertor,
        &validators,
        &SilentReporter,
        DEFAULT_CONVERTOR_ERROR,
        DEFAULT_VALIDATOR_ERROR,
    )
    .unwrap();
    assert_eq!(value, "hello");
}

#[test]
fn yes_no_prompt_with_completion() {
    let mut term = MockTerminal::with_response("yEaH");
    let mut prompt = Prompt::new(YesNoConvertor::new())
        .prompt("Continue")
        .reporter(silent())
        .cleaner(StripCleaner::default());
    assert_eq!(prompt.get(&mut term).unwrap(), Some("yes".to_string()));
}

#[test]
fn list_prompt_with_element_validation() {
    let mut term = MockTerminal::with_responses(["1, 200, 3", "1, 2, 3"]);
    let mut prompt = Prompt::new(ListConvertor::new(IntConvertor::new()))
        .prompt("Scores")
        .reporter(silent())
        .validator(
            ListValidator::new()
                .len_validator(LengthValidator::new(Some(1), Some(5)))
                .elem_validator(RangeValidator::new(Some(0), Some(100))),
        );
    assert_eq!(prompt.get(&mut term).unwrap(), Some(vec![1, 2, 3]));
}

#[test]
fn password_prompt_is_masked_and_validated() {
    let mut term = MockTerminal::with_responses(["weak", "Str0ng!pass"]);
    let mut prompt = Prompt::text()
        .prompt("Password")
        .hidden(true)
        .reporter(silent())
        .validator(
            PasswordValidator::new()
                .min_len(8)
                .min_upper(1)
                .min_digits(1),
        );
    assert_eq!(
        prompt.get(&mut term).unwrap(),
        Some("Str0ng!pass".to_string())
    );
    // Masked input is never echoed back through the terminal.
    assert!(!term.output().contains("Str0ng!pass"));
}

#[test]
fn none_of_suppresses_inner_reports_end_to_end() {
    let reporter = CapturingReporter::new();
    let banned = NoneOfValidator::new(vec![
        Box::new(RegexValidator::new("^admin$").unwrap()) as Box<dyn Validator<String>>,
        Box::new(RegexValidator::new("^root$").unwrap()),
    ]);

    let mut term = MockTerminal::with_responses(["root", "alice"]);
    let mut prompt = Prompt::text()
        .prompt("Username")
        .reporter(Rc::new(reporter.clone()))
        .validator(banned);
    assert_eq!(prompt.get(&mut term).unwrap(), Some("alice".to_string()));

    // Exactly one aggregate message for "root"; the inner regex failures on
    // "alice" stayed silent.
    assert_eq!(
        reporter.messages(),
        vec!["\"root\" value cannot match root".to_string()]
    );
}

#[test]
fn commands_and_interrupt_are_distinguishable_from_exhaustion() {
    let mut commands = CommandSet::new();
    commands.command("/cancel", |_, _| CommandOutcome::Cancel);

    let mut term = MockTerminal::with_response("/cancel");
    let mut prompt = Prompt::new(IntConvertor::new())
        .reporter(silent())
        .commands(commands)
        .retries(3);
    assert!(matches!(
        prompt.get(&mut term),
        Err(PromptError::Interrupted)
    ));

    let mut term = MockTerminal::with_responses(["a", "b", "c"]);
    let mut prompt = Prompt::new(IntConvertor::new())
        .reporter(silent())
        .retries(3);
    assert!(matches!(
        prompt.get(&mut term),
        Err(PromptError::MaxRetries { .. })
    ));
}

#[test]
fn table_round_trips_through_a_terminal() {
    let entries = vec![
        TableEntry::new(1, "red"),
        TableEntry::new(2, "blue"),
        TableEntry::new(4, "green"),
        TableEntry::new(6, "yellow"),
    ];

    let cases: &[(&str, LookupMode, ReturnMode, TableCell)] = &[
        ("2", LookupMode::Id, ReturnMode::Value, TableCell::Value("blue".into())),
        ("green", LookupMode::Either, ReturnMode::Id, TableCell::Id(4)),
        ("4", LookupMode::Either, ReturnMode::Id, TableCell::Id(4)),
        ("yellow", LookupMode::Value, ReturnMode::Value, TableCell::Value("yellow".into())),
    ];

    for (typed, input, output, expected) in cases {
        let mut term = MockTerminal::with_response(*typed);
        let picked = pick_from_table(&mut term, &entries, *input, *output, "Color", None).unwrap();
        assert_eq!(picked.as_ref(), Some(expected), "typed {:?}", typed);
    }
}

#[test]
fn choice_completion_feeds_the_table_convertor() {
    let entries = vec![
        TableEntry::new(1, "blue"),
        TableEntry::new(2, "brown"),
        TableEntry::new(3, "green"),
    ];
    // "gr" completes to "green" before the table lookup runs.
    let mut term = MockTerminal::with_response("gr");
    let values: Vec<String> = entries.iter().map(|e| e.value.clone()).collect();
    let mut prompt = Prompt::new(promptline::TableConvertor::new(
        entries.clone(),
        LookupMode::Value,
    ))
    .reporter(silent())
    .cleaner(StripCleaner::default())
    .cleaner(ChoiceCleaner::new(values));
    assert_eq!(
        prompt.get(&mut term).unwrap(),
        Some(TableCell::Value("green".to_string()))
    );
}

#[test]
fn validator_lists_are_anded_at_the_prompt_boundary() {
    let reporter = CapturingReporter::new();
    let validators: Vec<Box<dyn Validator<i64>>> = vec![
        Box::new(RangeValidator::new(Some(0), None)),
        Box::new(RangeValidator::new(None, Some(10))),
    ];
    assert!(in_all(&5, &validators, &reporter, DEFAULT_VALIDATOR_ERROR));
    assert!(!in_all(&11, &validators, &reporter, DEFAULT_VALIDATOR_ERROR));
}
