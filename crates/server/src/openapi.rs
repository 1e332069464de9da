use utoipa::OpenApi;
use utoipa::ToSchema;

/// A stored service version.
#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct ServiceDoc {
    pub id: i32,
    pub serviceName: String,
    pub describe: String,
    pub version: i32,
    pub isActive: bool,
    pub tags: String,
    pub createdAt: String,
    pub updatedAt: String,
    pub deletedAt: Option<String>,
}

#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct ServiceInputDoc {
    pub serviceName: String,
    pub describe: String,
    pub tags: String,
    pub isActive: Option<bool>,
}

#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct ServiceChangesDoc {
    pub describe: Option<String>,
    pub tags: Option<String>,
    pub isActive: Option<bool>,
}

/// Service row fields plus `currentVersion` and `totalVersion`.
#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct ServiceEnvelopeDoc {
    pub id: i32,
    pub serviceName: String,
    pub describe: String,
    pub version: i32,
    pub isActive: bool,
    pub tags: String,
    pub createdAt: String,
    pub updatedAt: String,
    pub deletedAt: Option<String>,
    pub currentVersion: i32,
    pub totalVersion: i32,
}

#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct MetaDoc {
    pub page: u64,
    pub pageSize: u64,
    pub totalResults: u64,
    pub totalPages: u64,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ServicePaginationDoc {
    pub meta: MetaDoc,
    pub data: Vec<ServiceEnvelopeDoc>,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorBodyDoc { pub message: String, pub error: String }

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MessageBodyDoc { pub message: String }

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ComponentsDoc { pub datastore: bool }

#[derive(ToSchema)]
#[allow(non_snake_case, dead_code)]
pub struct HealthReportDoc {
    pub status: String,
    pub statusCode: u16,
    pub components: ComponentsDoc,
    pub timestamp: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::services::list,
        crate::routes::services::create,
        crate::routes::services::fetch_by_name,
        crate::routes::services::create_version,
        crate::routes::services::fetch_version,
        crate::routes::services::update_version,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            ServiceDoc,
            ServiceInputDoc,
            ServiceChangesDoc,
            ServiceEnvelopeDoc,
            MetaDoc,
            ServicePaginationDoc,
            ErrorBodyDoc,
            MessageBodyDoc,
            ComponentsDoc,
            HealthReportDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services")
    )
)]
pub struct ApiDoc;
