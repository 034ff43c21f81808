#![allow(dead_code)]

use std::str::FromStr;

use bert_burn::model::BertModelConfig;
use burn::{
    module::{Module, ModuleVisitor, ParamId},
    tensor::{backend::Backend, Tensor},
};
use tokenizers::Tokenizer;

use burn_absa::{models::bert::aspect_sentiment::Config, pipelines::aspect_sentiment::Classifier};

include!("fixtures.rs");

/// A randomly initialized classifier over the test vocabulary
pub fn classifier<B: Backend>(seed: u64) -> Classifier<B> {
    classifier_with_config(seed, config())
}

/// A randomly initialized classifier with the given model configuration
pub fn classifier_with_config<B: Backend>(seed: u64, config: Config) -> Classifier<B> {
    B::seed(seed);

    let device = Default::default();
    let model = config.init::<B>(&device);

    Classifier::new(model, config, tokenizer(), device).unwrap()
}

struct ParamValues(Vec<f32>);

impl<B: Backend> ModuleVisitor<B> for ParamValues {
    fn visit_float<const D: usize>(&mut self, _id: &ParamId, tensor: &Tensor<B, D>) {
        self.0
            .extend(tensor.clone().into_data().convert::<f32>().value);
    }
}

/// Every float parameter of a module, flattened in visiting order
pub fn param_values<B: Backend, M: Module<B>>(module: &M) -> Vec<f32> {
    let mut values = ParamValues(Vec::new());
    module.visit(&mut values);

    values.0
}
