use crate::encoder;
use crate::error::Result;
use crate::models::{ContentPart, EncodedImage, GenerationRequest};

/// Closing line shared by every template.
pub const FINAL_DIRECTIVE: &str =
    "Generate ONLY the final prompt text, no explanations or meta-commentary.";

const INTRO: &str = "You are an expert poster designer and prompt engineer.";

fn style_only(description: &str) -> String {
    format!(
        "{INTRO} Analyze the style, color palette, composition, typography, and overall aesthetic of this reference image.

USER'S POSTER DESCRIPTION: {description}

Create a detailed AI image generation prompt that captures the exact visual style and artistic approach from the reference image, but applies it to the user's described poster concept.

The prompt should include:
- Specific artistic style and medium (e.g., vintage print, modern digital, hand-drawn, etc.)
- Color palette and mood
- Typography style and layout approach
- Compositional elements
- Any distinctive visual characteristics

{FINAL_DIRECTIVE}"
    )
}

fn single_composite(description: &str) -> String {
    format!(
        "{INTRO} Analyze these two images:

1. STYLE REFERENCE IMAGE: Study the artistic style, color palette, composition, typography style, and overall aesthetic
2. PERSON IMAGE: A person who should be composited into the poster design

USER'S POSTER DESCRIPTION: {description}

Create a detailed AI image generation prompt that:
- Captures the exact visual style, color scheme, and artistic approach from the reference image
- Composites the person from the second image as the main subject of the poster
- Incorporates the user's description for the poster content
- Maintains the reference image's aesthetic while featuring the person prominently
- Includes specific details about typography, layout, and design elements

{FINAL_DIRECTIVE}"
    )
}

fn group_composite(description: &str, count: usize) -> String {
    format!(
        "{INTRO} Analyze these images:

1. STYLE REFERENCE IMAGE: Study the artistic style, color palette, composition, typography style, and overall aesthetic
2. GROUP OF PEOPLE ({count} images): Multiple people who should ALL be composited together into ONE poster design

USER'S POSTER DESCRIPTION: {description}

Create a detailed AI image generation prompt that:
- Captures the exact visual style, color scheme, and artistic approach from the reference image
- Composites ALL {count} people from the provided images together as a unified group in the poster
- Incorporates the user's description for the poster content
- Maintains the reference image's aesthetic while featuring all people prominently as a cohesive group
- Includes specific details about typography, layout, and design elements
- Ensures all individuals are clearly visible and well-integrated into the composition

{FINAL_DIRECTIVE}"
    )
}

/// The instruction text for a request. The group template embeds the number
/// of person images actually carried by the request.
pub fn instruction_for(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::StyleOnly { description, .. } => style_only(description),
        GenerationRequest::SingleComposite { description, .. } => single_composite(description),
        GenerationRequest::GroupComposite {
            description,
            people,
            ..
        } => group_composite(description, people.len()),
    }
}

fn assemble(instruction: String, style: EncodedImage, people: Vec<EncodedImage>) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(2 + people.len());
    parts.push(ContentPart::text(instruction));
    parts.push(ContentPart::image(style));
    parts.extend(people.into_iter().map(ContentPart::image));
    parts
}

/// `[instruction, style, person 1, ..., person N]`, people in upload order.
pub fn build_call_payload(request: &GenerationRequest) -> Vec<ContentPart> {
    let style = encoder::encode(request.style());
    let people = request.people().iter().map(encoder::encode).collect();
    assemble(instruction_for(request), style, people)
}

/// Same output as [`build_call_payload`], encoding the images concurrently.
pub async fn build_call_payload_concurrent(request: &GenerationRequest) -> Result<Vec<ContentPart>> {
    let style = encoder::encode(request.style());
    let people = encoder::encode_all(request.people()).await?;
    Ok(assemble(instruction_for(request), style, people))
}
