use crate::error::{PosterError, Result};
use crate::models::{EncodedImage, ImageAsset};
use base64::{engine::general_purpose, Engine as _};
use futures::future::join_all;

/// Base64-encode an image. No type checks happen here; assets are validated
/// when they are created.
pub fn encode(asset: &ImageAsset) -> EncodedImage {
    EncodedImage {
        media_type: asset.media_type(),
        data: general_purpose::STANDARD.encode(asset.bytes()),
    }
}

pub fn decode(image: &EncodedImage) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(&image.data)
        .map_err(|e| PosterError::DecodeError(e.to_string()))
}

/// Encode several images concurrently. The output order always matches the
/// input order.
pub async fn encode_all(assets: &[ImageAsset]) -> Result<Vec<EncodedImage>> {
    let tasks = assets.iter().cloned().map(|asset| {
        tokio::task::spawn_blocking(move || encode(&asset))
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.map_err(encoding_task_failed))
        .collect()
}

fn encoding_task_failed(err: tokio::task::JoinError) -> PosterError {
    log::error!("Image encoding task failed: {}", err);
    PosterError::EncodingError(format!("encoding task failed: {}", err))
}
