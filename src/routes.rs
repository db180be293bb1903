use std::sync::Arc;

use poem::web::Data;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};

use crate::controller::{ImageController, UploadInfo};
use crate::errors::PipelineError;
use crate::records::ImageRecord;

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UploadPayload {
    /// The image payload as a base64 string without a `data:` prefix.
    pub file_content: String,

    /// The file name to store the image under, e.g. `sunset.jpg`.
    pub file_name: String,
}

#[derive(Object, Debug)]
pub struct ListImagesResponse {
    pub code: i32,
    pub data: Option<Vec<ImageRecord>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Object, Debug)]
pub struct UploadImageResponse {
    pub code: i32,
    pub data: Option<UploadInfo>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Object, Debug)]
pub struct RemoveImageResponse {
    pub code: i32,
    pub data: Option<RemovedImage>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Object, Debug)]
pub struct RemovedImage {
    pub id: String,
}

/// Splits a pipeline failure into the envelope's code, message and
/// (for server-side failures) detail fields.
fn failure(e: &PipelineError) -> (i32, String, Option<String>) {
    let code = e.status();
    let error = (code >= 500).then(|| format!("{:?}", e));
    (code, e.to_string(), error)
}

pub struct ImagesApi;

#[OpenApi]
impl ImagesApi {
    /// Lists every stored image record in store-native order.
    #[oai(path = "/images", method = "get")]
    pub async fn get_images(
        &self,
        controller: Data<&Arc<ImageController>>,
    ) -> Json<ListImagesResponse> {
        match controller.list_images().await {
            Ok(records) => Json(ListImagesResponse {
                code: 0,
                data: Some(records),
                message: None,
                error: None,
            }),
            Err(e) => {
                let (code, message, error) = failure(&e);
                Json(ListImagesResponse {
                    code,
                    data: None,
                    message: Some(message),
                    error,
                })
            },
        }
    }

    /// Ingests a new image.
    ///
    /// The original and a derived thumbnail are persisted to the blob
    /// store and a metadata record is committed for the pair.
    #[oai(path = "/images", method = "post")]
    pub async fn upload_image(
        &self,
        controller: Data<&Arc<ImageController>>,
        payload: Json<UploadPayload>,
    ) -> Json<UploadImageResponse> {
        match controller
            .upload_image(&payload.file_content, &payload.file_name)
            .await
        {
            Ok(info) => Json(UploadImageResponse {
                code: 0,
                data: Some(info),
                message: None,
                error: None,
            }),
            Err(e) => {
                let (code, message, error) = failure(&e);
                Json(UploadImageResponse {
                    code,
                    data: None,
                    message: Some(message),
                    error,
                })
            },
        }
    }

    /// Removes an image, deleting its blobs and its metadata record.
    #[oai(path = "/images/:id", method = "delete")]
    pub async fn remove_image(
        &self,
        controller: Data<&Arc<ImageController>>,
        id: Path<String>,
    ) -> Json<RemoveImageResponse> {
        match controller.remove_image(&id.0).await {
            Ok(id) => Json(RemoveImageResponse {
                code: 0,
                data: Some(RemovedImage { id }),
                message: Some("image deleted".to_string()),
                error: None,
            }),
            Err(e) => {
                let (code, message, error) = failure(&e);
                Json(RemoveImageResponse {
                    code,
                    data: None,
                    message: Some(message),
                    error,
                })
            },
        }
    }
}
