#[rustfmt::skip]
use super::router::{
    // Service
    __path_health_check,
    __path_service_info,
    // Settings
    settings::{__path_get_config, __path_update_config},
    // Extraction
    extract::{__path_list_models, __path_process_file, __path_process_uploaded_files},
    // Uploads
    upload::{__path_upload_file, __path_upload_files},
};
use super::dto::{
    ConfigUpdateResponse, ProcessFilePayload, ProcessFileResponse, ServiceInfo,
    UploadMultipleResponse,
};
use crate::core::{
    model::{BatchReport, ModelCatalog, UploadedFile},
    settings::{SettingsUpdate, SettingsView},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Service
        health_check,
        service_info,
        // Settings
        get_config,
        update_config,
        // Extraction
        list_models,
        process_file,
        process_uploaded_files,
        // Uploads
        upload_file,
        upload_files,
    ),
    components(schemas(
        ServiceInfo,
        SettingsView,
        SettingsUpdate,
        ConfigUpdateResponse,
        ModelCatalog,
        ProcessFilePayload,
        ProcessFileResponse,
        BatchReport,
        UploadedFile,
        UploadMultipleResponse,
    )),
    tags(
        (name = "tablex", description = "Table extraction API")
    )
)]
pub(super) struct ApiDoc;
