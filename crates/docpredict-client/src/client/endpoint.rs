//! Service endpoint construction.

use docpredict_core::{PredictionOptions, PublishSlot};
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::error::{Error, Result};

/// Path prefix shared by every document endpoint.
const DOCUMENTS_PATH: [&str; 4] = ["luis", "prediction", "v4.0-preview", "documents"];

/// `POST` target starting a document-to-text conversion.
pub(crate) fn convert_uri(endpoint: &Url) -> Result<Url> {
    documents_uri(endpoint, &["convert"])
}

/// `POST` target starting a text prediction.
///
/// Path segments are percent-encoded by [`Url`]; the query values are
/// encoded explicitly so the `$expand` key stays literal.
pub(crate) fn predict_uri(
    endpoint: &Url,
    app_id: &str,
    slot: PublishSlot,
    options: PredictionOptions,
) -> Result<Url> {
    let mut uri = documents_uri(
        endpoint,
        &["apps", app_id, "slots", slot.as_ref(), "predictText"],
    )?;

    let expand: String = byte_serialize(options.expand().as_bytes()).collect();
    uri.set_query(Some(&format!(
        "$expand={}&log={}",
        expand, options.log_query
    )));

    Ok(uri)
}

fn documents_uri(endpoint: &Url, segments: &[&str]) -> Result<Url> {
    let mut uri = endpoint.clone();
    uri.set_query(None);
    uri.set_fragment(None);

    uri.path_segments_mut()
        .map_err(|()| Error::invalid_config(format!("Endpoint '{}' cannot carry a path", endpoint)))?
        .pop_if_empty()
        .extend(DOCUMENTS_PATH)
        .extend(segments);

    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_convert_uri() {
        for base in [
            "https://westus.api.cognitive.microsoft.com",
            "https://westus.api.cognitive.microsoft.com/",
        ] {
            assert_eq!(
                convert_uri(&endpoint(base)).unwrap().as_str(),
                "https://westus.api.cognitive.microsoft.com/luis/prediction/v4.0-preview/documents/convert"
            );
        }
    }

    #[test]
    fn test_predict_uri_defaults() {
        let uri = predict_uri(
            &endpoint("https://host.example.com"),
            "9a1c3e2f-0000-4c1d-9a7e-123456789abc",
            PublishSlot::Production,
            PredictionOptions::default(),
        )
        .unwrap();

        assert_eq!(
            uri.as_str(),
            "https://host.example.com/luis/prediction/v4.0-preview/documents/apps/\
             9a1c3e2f-0000-4c1d-9a7e-123456789abc/slots/production/predictText\
             ?$expand=classifier%2Cextractor&log=false"
        );
    }

    #[test]
    fn test_predict_uri_encodes_inputs() {
        let options = PredictionOptions::default()
            .with_classifier_scores(false)
            .with_verbose_extraction(false)
            .with_log_query(true);
        let uri = predict_uri(
            &endpoint("https://host.example.com/proxy/"),
            "my app/1",
            PublishSlot::Staging,
            options,
        )
        .unwrap();

        assert_eq!(
            uri.as_str(),
            "https://host.example.com/proxy/luis/prediction/v4.0-preview/documents/apps/\
             my%20app%2F1/slots/staging/predictText?$expand=&log=true"
        );
    }
}
