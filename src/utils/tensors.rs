use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Build a 1D tensor of class ids, typically the targets of a classification batch
pub fn class_ids<B: Backend>(ids: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    Tensor::from_data(
        Data::new(
            ids.iter().map(|id| (*id as i64).elem()).collect(),
            Shape::new([ids.len()]),
        ),
        device,
    )
}

/// Flatten a 2D float tensor into row-major values
pub fn to_vec<B: Backend>(tensor: Tensor<B, 2>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().value
}
