use crate::error::ValidationError;
use crate::form::FormState;
use crate::models::GenerationRequest;

/// Turn the current form into a request, or say what is missing.
///
/// Checks run in a fixed order: style image, description, then the person
/// image(s) required by the active mode.
pub fn build_request(form: &FormState) -> Result<GenerationRequest, ValidationError> {
    let style = form.style().ok_or(ValidationError::MissingStyleImage)?;

    let description = form.description();
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    let flags = form.flags();
    let request = if flags.is_group() {
        let people: Vec<_> = form.group().cloned().collect();
        if people.is_empty() {
            return Err(ValidationError::MissingGroupImages);
        }
        GenerationRequest::GroupComposite {
            style: style.clone(),
            description: description.to_string(),
            people,
        }
    } else if flags.composite_person {
        let person = form.person().ok_or(ValidationError::MissingPersonImage)?;
        GenerationRequest::SingleComposite {
            style: style.clone(),
            description: description.to_string(),
            person: person.clone(),
        }
    } else {
        GenerationRequest::StyleOnly {
            style: style.clone(),
            description: description.to_string(),
        }
    };

    Ok(request)
}
