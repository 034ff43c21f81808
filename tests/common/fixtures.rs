// Shared by the unit tests and the integration tests. The includer provides
// `FromStr`, `BertModelConfig`, `Tokenizer` and the model `Config`.

pub type TestBackend = burn::backend::NdArray;

pub static VOCAB: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "great", "boring", "acting", "plot", "movie", "fun",
    "dull", "영화", "연기", "재미없다", "훌륭했다",
];

/// A whitespace word-level tokenizer with BERT special tokens
pub fn tokenizer() -> Tokenizer {
    tokenizer_from_vocab(VOCAB)
}

/// A whitespace word-level tokenizer over the given vocabulary, which must start with
/// `[PAD] [UNK] [CLS] [SEP]`
pub fn tokenizer_from_vocab(vocab: &[&str]) -> Tokenizer {
    let vocab = vocab
        .iter()
        .enumerate()
        .map(|(id, token)| format!("\"{}\": {}", token, id))
        .collect::<Vec<_>>()
        .join(", ");

    let json = format!(
        r#"{{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {{ "type": "Whitespace" }},
            "post_processor": {{
                "type": "BertProcessing",
                "sep": ["[SEP]", 3],
                "cls": ["[CLS]", 2]
            }},
            "decoder": null,
            "model": {{
                "type": "WordLevel",
                "vocab": {{ {} }},
                "unk_token": "[UNK]"
            }}
        }}"#,
        vocab
    );

    Tokenizer::from_str(&json).unwrap()
}

/// A tiny BERT configuration over the test vocabulary
pub fn config() -> Config {
    let bert = BertModelConfig::new(
        2,
        1,
        1e-12,
        8,
        16,
        VOCAB.len(),
        32,
        2,
        0.0,
        "bert".to_string(),
        0,
    )
    .with_max_seq_len(Some(16))
    .with_with_pooling_layer(Some(true));

    Config::new_with_sentiments(bert)
        .with_classifier_dropout(0.0)
        .with_max_seq_len(16)
}
