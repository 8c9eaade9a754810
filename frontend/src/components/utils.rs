use gloo_file::File as GlooFile;
use gloo_file::futures::read_as_bytes;
use shared::upload::check_type_and_size;
use shared::{MAX_UPLOAD_BYTES, PickedImage, ValidationError};
use wasm_bindgen::JsCast;
use web_sys::{FileList, HtmlInputElement};
use yew::prelude::*;

pub fn first_file(file_list: &FileList) -> Option<GlooFile> {
    file_list.item(0).map(GlooFile::from)
}

/// The file currently chosen in an `<input type="file">` change event.
pub fn chosen_file(e: &Event) -> Option<GlooFile> {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.files().as_ref().and_then(first_file)
}

/// Opens the file dialog of a hidden input.
pub fn open_file_dialog(input_id: &str) {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id));
    if let Some(input) = input {
        if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
            html_input.click();
        }
    }
}

/// JPEG/PNG and the size cap, judged from the file's metadata alone.
pub fn check_file_metadata(file: &GlooFile) -> Result<(), ValidationError> {
    check_type_and_size(Some(&file.raw_mime_type()), file.size())
}

pub fn check_file_size(file: &GlooFile) -> Result<(), ValidationError> {
    let size = file.size();
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Reads the whole file; run one of the checks above first.
pub async fn read_picked_image(file: GlooFile) -> Result<PickedImage, String> {
    let bytes = read_as_bytes(&file)
        .await
        .map_err(|e| format!("Could not read {}: {}", file.name(), e))?;
    Ok(PickedImage::from_bytes(
        Some(file.name()),
        Some(file.raw_mime_type()),
        bytes,
    ))
}

pub fn render_error_message(error: Option<&str>) -> Html {
    if let Some(error_msg) = error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
