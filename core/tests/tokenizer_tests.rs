use search_core::tokenizer::{normalize, normalize_joined};

#[test]
fn it_normalizes_and_stems() {
    let words = normalize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // diacritics folded: café -> cafe
    assert!(words.contains(&"cafe".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn query_and_plot_normalize_alike() {
    assert_eq!(normalize("DRAGONS"), normalize("dragons"));
    assert!(normalize_joined("A wizard and his dragons").contains(&normalize_joined("Dragons")));
}
