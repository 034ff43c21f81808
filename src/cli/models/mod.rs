use std::fmt::Display;

/// CLI Indexes: BERT models
pub mod bert;

/// Available Models
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Model {
    /// The BERT family of models, with the specific model name contained within
    Bert(String),
}

impl Model {
    /// Get the model type
    pub fn model_type(&self) -> &str {
        match self {
            Model::Bert(_) => bert::MODEL_TYPE,
        }
    }

    /// Get the Hugging Face Hub model name
    pub fn name(&self) -> &str {
        match self {
            Model::Bert(name) => name,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Bert(bert::DEFAULT_ASPECT_SENTIMENT_MODEL.to_string())
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for Model {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if bert::ALL_MODELS.contains(&value) {
            Ok(Model::Bert(value.to_string()))
        } else {
            Err(ModelError::Unknown(value.to_string()))
        }
    }
}

/// Model Error
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// No model found for the given string
    #[error("no model found for {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_models() {
        let model = Model::try_from("bert-base-multilingual-uncased").unwrap();

        assert_eq!(model.model_type(), "bert");
        assert_eq!(model.to_string(), "bert-base-multilingual-uncased");
        assert_eq!(Model::default().name(), "bert-base-multilingual-cased");
        assert!(Model::try_from("gpt2").is_err());
    }
}
