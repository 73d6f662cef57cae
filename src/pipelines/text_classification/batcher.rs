use burn::{
    data::dataloader,
    tensor::{backend::Backend, Data, ElementConversion, Int, Tensor},
};
use derive_new::new;

use crate::{text::Vectorizer, utils::tensors::pad_sequences};

use super::Item;

/// An inference batch: padded token ids as `[batch_size, max_length]`
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized text as a 2D tensor of token ids
    pub tokens: Tensor<B, 2, Int>,
}

/// A training batch: inference input plus the target class per row
#[derive(Debug, Clone, new)]
pub struct Train<B: Backend> {
    /// Network input
    pub input: Infer<B>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Batches text through the fitted vectorizer
///
/// The same vectorizer instance (and its recorded padding length) serves
/// both phases, keeping train and test sequences on an identical contract.
#[derive(Clone, new)]
pub struct Batcher<B: Backend> {
    vectorizer: Vectorizer,
    device: B::Device,
}

impl<B: Backend> dataloader::batcher::Batcher<Item, Train<B>> for Batcher<B> {
    fn batch(&self, items: Vec<Item>) -> Train<B> {
        let mut sequences = Vec::with_capacity(items.len());
        let mut targets = Vec::with_capacity(items.len());

        for item in items {
            sequences.push(self.vectorizer.encode(&item.text));
            targets.push(Tensor::from_data(
                Data::from([(item.label as i64).elem()]),
                &self.device,
            ));
        }

        let tokens = pad_sequences(sequences, self.vectorizer.max_length(), &self.device);

        Train {
            input: Infer { tokens },
            targets: Tensor::cat(targets, 0),
        }
    }
}

impl<B: Backend> dataloader::batcher::Batcher<String, Infer<B>> for Batcher<B> {
    fn batch(&self, items: Vec<String>) -> Infer<B> {
        let sequences = items
            .iter()
            .map(|text| self.vectorizer.encode(text))
            .collect();

        Infer {
            tokens: pad_sequences(sequences, self.vectorizer.max_length(), &self.device),
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::data::dataloader::batcher::Batcher as BatcherTrait;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn fitted() -> Vectorizer {
        Vectorizer::fit(&[
            "deep deep learning".to_string(),
            "deep networks learn".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn pads_every_row_to_the_recorded_length() {
        let batcher = Batcher::<TestBackend>::new(fitted(), Default::default());

        let batch: Infer<TestBackend> =
            batcher.batch(vec!["deep learning".to_string(), "learn".to_string()]);

        assert_eq!(batch.tokens.dims(), [2, 3]);
    }

    #[test]
    fn training_batches_carry_targets() {
        let batcher = Batcher::<TestBackend>::new(fitted(), Default::default());

        let batch: Train<TestBackend> = batcher.batch(vec![
            Item::new("deep learning".to_string(), 1),
            Item::new("deep networks".to_string(), 0),
        ]);

        assert_eq!(batch.input.tokens.dims(), [2, 3]);
        assert_eq!(
            batch.targets.into_data().convert::<i64>().value,
            vec![1, 0]
        );
    }
}
