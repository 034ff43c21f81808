use std::str::FromStr;

use bert_burn::model::BertModelConfig;
use tokenizers::Tokenizer;

use crate::models::bert::aspect_sentiment::Config;

include!("../tests/common/fixtures.rs");
