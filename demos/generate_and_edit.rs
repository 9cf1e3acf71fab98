//! Generates an image, then edits it with a second prompt.
//!
//! Run with: `cargo run --example generate_and_edit -- [input_image.png]`
//!
//! Without an input image the freshly generated image is edited. Expects the
//! image service at `IMAGE_STUDIO_API_BASE_URL` (default `http://localhost:8000`).

use image_studio::{HttpImageApi, ImageFile, ImageSize, Studio};

#[tokio::main]
async fn main() -> image_studio::Result<()> {
    let studio = Studio::new(HttpImageApi::builder().build());

    if let Some(path) = std::env::args().nth(1) {
        studio.select_upload(ImageFile::read(&path).await?);
    } else {
        studio.set_generate_prompt("A watercolor painting of a lighthouse on a stormy coast");
        studio.set_size(ImageSize::Landscape);
        let generated = studio.submit_generate().await?;
        let size = generated.save("generated.png").await?;
        println!("Generated image saved to generated.png ({size} bytes)");
    }

    studio.set_edit_prompt("Add stars in the night sky and a calm moonlit glow.");
    let edited = studio.submit_edit().await?;
    let size = edited.save("edited.png").await?;
    println!("Edited image saved to edited.png ({size} bytes)");

    Ok(())
}
