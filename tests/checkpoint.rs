mod common;

use std::fs;

use burn_absa::{pipelines::aspect_sentiment::Classifier, Error};
use common::TestBackend;
use pretty_assertions::assert_eq;

static SAMPLES: &[(&str, &str)] = &[
    ("great acting", "acting"),
    ("boring plot", "plot"),
    ("영화 재미없다", "영화"),
    ("연기 훌륭했다", "연기"),
];

#[test]
fn saved_checkpoints_reload_with_the_same_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = common::classifier::<TestBackend>(11);

    classifier.save(dir.path()).unwrap();

    assert!(dir.path().join("config.json").is_file());
    assert!(dir.path().join("tokenizer.json").is_file());

    let loaded = Classifier::<TestBackend>::load(dir.path(), &Default::default()).unwrap();

    let before = classifier.predict_batch(SAMPLES).unwrap();
    let after = loaded.predict_batch(SAMPLES).unwrap();

    // The compact recorder stores half precision weights
    for (before, after) in before.iter().zip(&after) {
        for (a, b) in before.scores.iter().zip(after.scores) {
            assert!((a - b).abs() < 0.05, "{} vs {}", a, b);
        }
    }

    assert_eq!(loaded.config().id2label, classifier.config().id2label);
}

#[test]
fn fixed_checkpoints_predict_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    common::classifier::<TestBackend>(5).save(dir.path()).unwrap();

    let first = Classifier::<TestBackend>::load(dir.path(), &Default::default()).unwrap();
    let second = Classifier::<TestBackend>::load(dir.path(), &Default::default()).unwrap();

    for (text, aspect) in SAMPLES {
        let label = first.predict(text, aspect).unwrap();

        assert_eq!(first.predict(text, aspect).unwrap(), label);
        assert_eq!(second.predict(text, aspect).unwrap(), label);
    }
}

#[test]
fn missing_checkpoints_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();

    let result = Classifier::<TestBackend>::load(dir.path().join("absent"), &Default::default());
    assert!(matches!(result, Err(Error::Checkpoint(_))));

    // An empty directory has no config
    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());
    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

#[test]
fn checkpoints_without_weights_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    common::classifier::<TestBackend>(1).save(dir.path()).unwrap();

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("model"))
        {
            fs::remove_file(path).unwrap();
        }
    }

    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

#[test]
fn checkpoints_with_other_label_sets_are_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    common::classifier::<TestBackend>(2).save(dir.path()).unwrap();

    edit_config(dir.path(), |config| {
        config["id2label"]["2"] = serde_json::Value::String("neutral".to_string());
    });

    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

fn edit_config(dir: &std::path::Path, edit: impl FnOnce(&mut serde_json::Value)) {
    let config_path = dir.join("config.json");
    let mut config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    edit(&mut config);
    fs::write(&config_path, config.to_string()).unwrap();
}

#[test]
fn checkpoints_with_fewer_configured_layers_are_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config();
    config.bert.num_hidden_layers = 2;
    common::classifier_with_config::<TestBackend>(3, config)
        .save(dir.path())
        .unwrap();

    edit_config(dir.path(), |config| {
        config["bert"]["num_hidden_layers"] = serde_json::Value::from(1);
    });

    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

#[test]
fn checkpoints_with_a_larger_tokenizer_are_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    common::classifier::<TestBackend>(12).save(dir.path()).unwrap();

    let mut vocab = common::VOCAB.to_vec();
    vocab.extend(["plot-twist", "soundtrack", "ending"]);
    common::tokenizer_from_vocab(&vocab)
        .save(dir.path().join("tokenizer.json"), false)
        .unwrap();

    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

#[test]
fn checkpoints_with_a_different_vocab_size_are_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    common::classifier::<TestBackend>(13).save(dir.path()).unwrap();

    edit_config(dir.path(), |config| {
        config["bert"]["vocab_size"] = serde_json::Value::from(common::VOCAB.len() + 5);
    });

    let result = Classifier::<TestBackend>::load(dir.path(), &Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}

#[test]
fn classifiers_reject_tokenizers_larger_than_the_embeddings() {
    let mut config = common::config();
    config.bert.vocab_size = 4;
    let model = config.init::<TestBackend>(&Default::default());

    let result = Classifier::new(model, config, common::tokenizer(), Default::default());

    assert!(matches!(result, Err(Error::Checkpoint(_))));
}
