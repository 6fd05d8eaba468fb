// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State as AxumState, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bsms::{BusRow, StudentRow};
use bsms_api::{
    AddStudentRequest, AddStudentResponse, ApiError, AssignStudentRequest, AssignStudentResponse,
    AttendanceRequest, AttendanceResponse, BulkUploadRequest, BusAssignmentResponse,
    BusSummaryInfo, ConsolidateRequest, ConsolidateResponse, ImportBusesResponse,
    ImportStudentsResponse, IssueTicketRequest, IssueTicketResponse, PassengerInfo,
    RemoveTicketResponse, ReplaceConductorRequest, ReplaceDriverRequest, RoleResponse,
    StaffUpdateResponse, add_walk_on_student, assign_student, bus_for_conductor, bus_rows_from_csv,
    bus_rows_from_json, consolidate_offday, find_passenger, fleet_summary, identify_role,
    import_buses, import_students, issue_ticket, list_buses, list_passengers, list_tickets,
    mark_attendance, remove_ticket, replace_conductor, replace_driver, student_rows_from_csv,
    student_rows_from_json,
};
use bsms_domain::{Bus, Ticket};
use bsms_persistence::{JsonFileStore, MemoryStore, RosterStore};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

/// BSMS Server - HTTP server for the Bus Seat Management System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the roster JSON files. If not provided, uses an
    /// in-memory store.
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3001)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the roster store wrapped in a Mutex to allow safe
/// concurrent access.
#[derive(Clone)]
struct AppState {
    /// The roster store for buses, students, and day tickets.
    store: Arc<Mutex<Box<dyn RosterStore + Send>>>,
}

/// Standard error response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// Always true for error responses.
    error: bool,
    /// Human-readable error message.
    message: String,
}

/// Health check response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct HealthResponse {
    ok: bool,
}

/// Acknowledgement for the incharge alert endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AlertAck {
    ok: bool,
}

/// Query parameters scoping a listing to one bus.
#[derive(Debug, Clone, Deserialize)]
struct BusScopeQuery {
    bus_no: Option<u32>,
}

/// Query parameters scoping a ticket removal to a conductor's bus.
#[derive(Debug, Clone, Deserialize)]
struct ConductorScopeQuery {
    conductor_id: Option<String>,
}

/// An HTTP error with a status code and message.
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } | ApiError::InvalidCsvFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnauthorizedScope { .. } => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => {
                error!("Internal error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn bad_upload(err: &MultipartError) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid upload: {err}"),
    }
}

/// Today's date in the server's local offset, falling back to UTC when
/// the local offset cannot be determined.
fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Milliseconds since the Unix epoch, used to synthesize ticket ids.
fn epoch_ms() -> i128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i128::try_from(elapsed.as_millis()).unwrap_or(i128::MAX)
        })
}

/// Rejects bulk uploads with no rows.
///
/// An empty batch would otherwise replace the roster with nothing.
fn require_upload_data(req: &BulkUploadRequest) -> Result<(), HttpError> {
    if req.data.is_empty() {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: String::from("Expected { data: [...] }"),
        });
    }
    Ok(())
}

/// Reads the bytes of the multipart field named `file`.
async fn read_upload_file(multipart: &mut Multipart) -> Result<Vec<u8>, HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| bad_upload(&e))? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| bad_upload(&e))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(HttpError {
        status: StatusCode::BAD_REQUEST,
        message: String::from("Missing 'file' upload field"),
    })
}

/// Handler for GET `/` endpoint.
async fn handle_root() -> &'static str {
    "BSMS backend is live"
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Handler for GET `/api/buses` endpoint.
async fn handle_list_buses(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Bus>>, HttpError> {
    let mut store = app_state.store.lock().await;
    let buses: Vec<Bus> = list_buses(store.as_mut())?;
    Ok(Json(buses))
}

/// Handler for GET `/api/students` endpoint.
///
/// Returns the merged passenger view, optionally scoped to one bus.
async fn handle_list_students(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<BusScopeQuery>,
) -> Result<Json<Vec<PassengerInfo>>, HttpError> {
    let mut store = app_state.store.lock().await;
    let passengers: Vec<PassengerInfo> =
        list_passengers(store.as_mut(), query.bus_no, local_today())?;
    Ok(Json(passengers))
}

/// Handler for GET `/api/student/{id}` endpoint.
async fn handle_find_student(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PassengerInfo>, HttpError> {
    let mut store = app_state.store.lock().await;
    let passenger: PassengerInfo = find_passenger(store.as_mut(), &id, local_today())?;
    Ok(Json(passenger))
}

/// Handler for GET `/api/conductor/{id}` endpoint.
///
/// Resolves a conductor id to their assigned bus.
async fn handle_conductor_bus(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BusAssignmentResponse>, HttpError> {
    let mut store = app_state.store.lock().await;
    let response: BusAssignmentResponse = bus_for_conductor(store.as_mut(), &id)?;
    Ok(Json(response))
}

/// Handler for GET `/api/conductor/tickets` endpoint.
async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<BusScopeQuery>,
) -> Result<Json<Vec<Ticket>>, HttpError> {
    let mut store = app_state.store.lock().await;
    let tickets: Vec<Ticket> = list_tickets(store.as_mut(), query.bus_no, local_today())?;
    Ok(Json(tickets))
}

/// Handler for POST `/api/conductor/attendance` endpoint.
async fn handle_attendance(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(
        student_id = %req.student_id,
        present = req.present,
        "Handling attendance request"
    );
    let mut store = app_state.store.lock().await;
    let response: AttendanceResponse = mark_attendance(store.as_mut(), &req, local_today())?;
    Ok(Json(response))
}

/// Handler for POST `/api/conductor/ticket` endpoint.
async fn handle_issue_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<IssueTicketRequest>,
) -> Result<Json<IssueTicketResponse>, HttpError> {
    info!(
        conductor_id = %req.conductor_id,
        name = %req.name,
        "Handling issue_ticket request"
    );
    let mut store = app_state.store.lock().await;
    let response: IssueTicketResponse =
        issue_ticket(store.as_mut(), &req, local_today(), epoch_ms())?;
    Ok(Json(response))
}

/// Handler for DELETE `/api/conductor/ticket/{id}` endpoint.
///
/// When a `conductor_id` query parameter is present the ticket must
/// belong to that conductor's bus.
async fn handle_remove_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConductorScopeQuery>,
) -> Result<Json<RemoveTicketResponse>, HttpError> {
    info!(ticket_id = %id, "Handling remove_ticket request");
    let mut store = app_state.store.lock().await;
    let response: RemoveTicketResponse = remove_ticket(
        store.as_mut(),
        query.conductor_id.as_deref(),
        &id,
        local_today(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/api/conductor/add-student` endpoint.
async fn handle_add_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddStudentRequest>,
) -> Result<Json<AddStudentResponse>, HttpError> {
    info!(
        conductor_id = %req.conductor_id,
        student_id = %req.student_id,
        "Handling add_student request"
    );
    let mut store = app_state.store.lock().await;
    let response: AddStudentResponse = add_walk_on_student(store.as_mut(), &req, local_today())?;
    Ok(Json(response))
}

/// Handler for POST `/upload/bus` endpoint.
///
/// Accepts a multipart CSV upload and replaces the bus roster.
async fn handle_upload_bus_csv(
    AxumState(app_state): AxumState<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportBusesResponse>, HttpError> {
    let bytes: Vec<u8> = read_upload_file(&mut multipart).await?;
    let rows: Vec<BusRow> = bus_rows_from_csv(&bytes)?;
    info!(rows = rows.len(), "Handling bus CSV upload");
    let mut store = app_state.store.lock().await;
    let response: ImportBusesResponse = import_buses(store.as_mut(), &rows)?;
    Ok(Json(response))
}

/// Handler for POST `/upload/student` endpoint.
///
/// Accepts a multipart CSV upload and appends reconciled students.
async fn handle_upload_student_csv(
    AxumState(app_state): AxumState<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportStudentsResponse>, HttpError> {
    let bytes: Vec<u8> = read_upload_file(&mut multipart).await?;
    let rows: Vec<StudentRow> = student_rows_from_csv(&bytes)?;
    info!(rows = rows.len(), "Handling student CSV upload");
    let mut store = app_state.store.lock().await;
    let response: ImportStudentsResponse = import_students(store.as_mut(), &rows)?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/upload-buses` endpoint.
///
/// Accepts parsed rows from the MTO dashboard and replaces the bus
/// roster.
async fn handle_mto_upload_buses(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkUploadRequest>,
) -> Result<Json<ImportBusesResponse>, HttpError> {
    require_upload_data(&req)?;
    let rows: Vec<BusRow> = bus_rows_from_json(&req.data);
    info!(rows = rows.len(), "Handling MTO bus upload");
    let mut store = app_state.store.lock().await;
    let response: ImportBusesResponse = import_buses(store.as_mut(), &rows)?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/upload-students` endpoint.
async fn handle_mto_upload_students(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkUploadRequest>,
) -> Result<Json<ImportStudentsResponse>, HttpError> {
    require_upload_data(&req)?;
    let rows: Vec<StudentRow> = student_rows_from_json(&req.data);
    info!(rows = rows.len(), "Handling MTO student upload");
    let mut store = app_state.store.lock().await;
    let response: ImportStudentsResponse = import_students(store.as_mut(), &rows)?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/driver` endpoint.
async fn handle_replace_driver(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReplaceDriverRequest>,
) -> Result<Json<StaffUpdateResponse>, HttpError> {
    info!(bus_no = req.bus_no, "Handling replace_driver request");
    let mut store = app_state.store.lock().await;
    let response: StaffUpdateResponse = replace_driver(store.as_mut(), &req)?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/conductor` endpoint.
async fn handle_replace_conductor(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReplaceConductorRequest>,
) -> Result<Json<StaffUpdateResponse>, HttpError> {
    info!(bus_no = req.bus_no, "Handling replace_conductor request");
    let mut store = app_state.store.lock().await;
    let response: StaffUpdateResponse = replace_conductor(store.as_mut(), &req)?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/assign` endpoint.
async fn handle_assign_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignStudentRequest>,
) -> Result<Json<AssignStudentResponse>, HttpError> {
    info!(
        student_id = %req.student_id,
        bus_no = req.bus_no,
        "Handling assign_student request"
    );
    let mut store = app_state.store.lock().await;
    let response: AssignStudentResponse = assign_student(store.as_mut(), &req, local_today())?;
    Ok(Json(response))
}

/// Handler for POST `/api/mto/adjust-offday` endpoint.
///
/// Plans an off-day route consolidation and applies it when requested.
async fn handle_adjust_offday(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ConsolidateRequest>,
) -> Result<Json<ConsolidateResponse>, HttpError> {
    info!(
        routes = req.routes.len(),
        apply = req.apply,
        "Handling adjust_offday request"
    );
    let mut store = app_state.store.lock().await;
    let response: ConsolidateResponse = consolidate_offday(store.as_mut(), &req, local_today())?;
    Ok(Json(response))
}

/// Handler for GET `/api/incharge/summary` endpoint.
async fn handle_incharge_summary(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<BusSummaryInfo>>, HttpError> {
    let mut store = app_state.store.lock().await;
    let summary: Vec<BusSummaryInfo> = fleet_summary(store.as_mut(), local_today())?;
    Ok(Json(summary))
}

/// Handler for POST `/api/incharge/alert` endpoint.
///
/// Alerts are logged and acknowledged; there is no delivery channel.
async fn handle_incharge_alert(Json(body): Json<serde_json::Value>) -> Json<AlertAck> {
    info!(alert = %body, "Incharge alert received");
    Json(AlertAck { ok: true })
}

/// Handler for GET `/api/role/{id}` endpoint.
async fn handle_role(Path(id): Path<String>) -> Result<Json<RoleResponse>, HttpError> {
    let response: RoleResponse = identify_role(&id)?;
    Ok(Json(response))
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/upload/bus", post(handle_upload_bus_csv))
        .route("/upload/student", post(handle_upload_student_csv))
        .route("/api/buses", get(handle_list_buses))
        .route("/api/students", get(handle_list_students))
        .route("/api/student/{id}", get(handle_find_student))
        .route("/api/conductor/tickets", get(handle_list_tickets))
        .route("/api/conductor/attendance", post(handle_attendance))
        .route("/api/conductor/ticket", post(handle_issue_ticket))
        .route("/api/conductor/ticket/{id}", delete(handle_remove_ticket))
        .route("/api/conductor/add-student", post(handle_add_student))
        .route("/api/conductor/{id}", get(handle_conductor_bus))
        .route("/api/mto/upload-buses", post(handle_mto_upload_buses))
        .route("/api/mto/upload-students", post(handle_mto_upload_students))
        .route("/api/mto/driver", post(handle_replace_driver))
        .route("/api/mto/conductor", post(handle_replace_conductor))
        .route("/api/mto/assign", post(handle_assign_student))
        .route("/api/mto/adjust-offday", post(handle_adjust_offday))
        .route("/api/incharge/summary", get(handle_incharge_summary))
        .route("/api/incharge/alert", post(handle_incharge_alert))
        .route("/api/role/{id}", get(handle_role))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing BSMS Server");

    // Initialize the roster store (in-memory or file-based based on CLI
    // argument)
    let store: Box<dyn RosterStore + Send> = if let Some(dir) = &args.data_dir {
        info!("Using JSON data directory at: {}", dir);
        Box::new(JsonFileStore::new(dir)?)
    } else {
        info!("Using in-memory roster store");
        Box::new(MemoryStore::new())
    };

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use bsms::RosterState;
    use bsms_domain::Student;
    use tower::ServiceExt;

    fn test_bus(bus_no: u32, route: &str, capacity: u32) -> Bus {
        Bus {
            bus_no,
            vehicle_no: None,
            driver: Some(String::from("Driver")),
            driver_contact: None,
            helper: None,
            helper_contact: None,
            route: String::from(route),
            time: None,
            capacity,
            conductor_id: Some(format!("C{bus_no:03}")),
        }
    }

    fn test_student(student_id: &str, bus_no: u32, seat: u32) -> Student {
        Student {
            student_id: String::from(student_id),
            name: format!("Student {student_id}"),
            course: None,
            year: None,
            bus_no: Some(bus_no),
            seat: Some(seat),
            present: false,
            fee_paid: true,
        }
    }

    fn test_ticket(student_id: &str, bus_no: u32, seat: u32) -> Ticket {
        Ticket {
            student_id: String::from(student_id),
            name: format!("Passenger {student_id}"),
            bus_no,
            seat,
            date: local_today(),
            present: false,
        }
    }

    /// Helper to create test app state over an in-memory store.
    fn create_test_app_state(state: RosterState) -> AppState {
        let store: Box<dyn RosterStore + Send> = Box::new(MemoryStore::with_state(state));
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn seeded_state() -> RosterState {
        RosterState {
            buses: vec![test_bus(1, "north", 4)],
            students: vec![test_student("S1", 1, 1)],
            tickets: vec![test_ticket("T1", 1, 2)],
        }
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_ok() {
        let app: Router = build_router(create_test_app_state(RosterState::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_list_buses_returns_the_roster() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/buses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["bus_no"], 1);
        assert_eq!(body[0]["route"], "north");
    }

    #[tokio::test]
    async fn test_student_listing_merges_tickets() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/students?bus_no=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        let passengers = body.as_array().unwrap();
        assert_eq!(passengers.len(), 2);
        assert_eq!(passengers[0]["is_temp"], false);
        assert_eq!(passengers[1]["is_temp"], true);
    }

    #[tokio::test]
    async fn test_unknown_student_is_not_found() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/student/S9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_conductor_resolves_their_bus() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/conductor/C001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["bus_no"], 1);
    }

    #[tokio::test]
    async fn test_unassigned_conductor_is_forbidden() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/conductor/C999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_issue_ticket_assigns_the_next_seat() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/conductor/ticket",
                r#"{"conductor_id":"C001","name":"Walk On"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Ticket added");
        assert_eq!(body["ticket"]["seat"], 3);
    }

    #[tokio::test]
    async fn test_issue_ticket_on_full_bus_is_unprocessable() {
        let state = RosterState {
            buses: vec![test_bus(1, "north", 1)],
            students: vec![test_student("S1", 1, 1)],
            tickets: Vec::new(),
        };
        let app: Router = build_router(create_test_app_state(state));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/conductor/ticket",
                r#"{"conductor_id":"C001","name":"Walk On"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_remove_ticket_outside_scope_is_forbidden() {
        let state = RosterState {
            buses: vec![test_bus(1, "north", 4), test_bus(2, "south", 4)],
            students: Vec::new(),
            tickets: vec![test_ticket("T1", 1, 1)],
        };
        let app: Router = build_router(create_test_app_state(state));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/conductor/ticket/T1?conductor_id=C002")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_remove_ticket_within_scope_succeeds() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/conductor/ticket/T1?conductor_id=C001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Ticket removed");
    }

    #[tokio::test]
    async fn test_duplicate_walk_on_student_is_a_conflict() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/conductor/add-student",
                r#"{"conductor_id":"C001","student_id":"S1","name":"Dup"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_mto_bus_upload_replaces_the_roster() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/mto/upload-buses",
                r#"{"data":[{"Bus No":"5","Route":"West","Capacity":"40","Conductor ID":"C005"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Buses uploaded successfully!");
        assert_eq!(body["count"], 1);

        let listing = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/buses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let buses = response_json(listing).await;
        assert_eq!(buses[0]["bus_no"], 5);
        // Routes keep their trimmed original casing; matching is
        // case-insensitive at lookup time.
        assert_eq!(buses[0]["route"], "West");
    }

    #[tokio::test]
    async fn test_empty_mto_bus_upload_is_rejected_and_keeps_the_fleet() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/mto/upload-buses",
                r#"{"data":[]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);

        // The seeded fleet must survive the rejected upload.
        let listing = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/buses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let buses = response_json(listing).await;
        assert_eq!(buses.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_mto_student_upload_is_rejected() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/mto/upload-students",
                r#"{"data":[]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mto_student_upload_appends_rows() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/mto/upload-students",
                r#"{"data":[{"Student ID":"S2","Name":"Mina","Route":"north","Fee Paid":"yes"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Students uploaded!");
        assert_eq!(body["added"], 1);
    }

    #[tokio::test]
    async fn test_bus_csv_multipart_upload() {
        let app: Router = build_router(create_test_app_state(RosterState::default()));

        let boundary: &str = "bsms-test-boundary";
        let csv: &str = "Bus No,Route,Capacity,Conductor ID\n3,East,30,C003\n";
        let body: String = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"buses.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{boundary}--\r\n"
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload/bus")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_multipart_without_file_field_is_bad_request() {
        let app: Router = build_router(create_test_app_state(RosterState::default()));

        let boundary: &str = "bsms-test-boundary";
        let body: String = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             data\r\n\
             --{boundary}--\r\n"
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload/bus")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_replace_driver_round_trips() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/mto/driver",
                r#"{"bus_no":1,"driver_name":"Ravi","driver_contact":"99999"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Driver updated");
    }

    #[tokio::test]
    async fn test_adjust_offday_plans_without_applying() {
        let state = RosterState {
            buses: vec![test_bus(1, "north", 2), test_bus(2, "north", 2)],
            students: vec![test_student("A", 2, 1), test_student("B", 2, 2)],
            tickets: Vec::new(),
        };
        let app: Router = build_router(create_test_app_state(state));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/mto/adjust-offday",
                r#"{"routes":["north"],"off":{"courses":[],"years":[]},"apply":false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["plans"][0]["keep_bus_no"], 1);
        assert_eq!(body["plans"][0]["moved"].as_array().unwrap().len(), 2);

        // Planning must not move anyone.
        let listing = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/students?bus_no=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let passengers = response_json(listing).await;
        assert_eq!(passengers.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_offday_without_routes_is_bad_request() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/mto/adjust-offday",
                r#"{"routes":[],"apply":false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_incharge_summary_counts_occupancy() {
        let app: Router = build_router(create_test_app_state(seeded_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/incharge/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body[0]["occupied"], 2);
        assert_eq!(body[0]["capacity"], 4);
    }

    #[tokio::test]
    async fn test_incharge_alert_is_acknowledged() {
        let app: Router = build_router(create_test_app_state(RosterState::default()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/incharge/alert",
                r#"{"message":"Bus 3 is late"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_role_endpoint_maps_prefixes() {
        let app: Router = build_router(create_test_app_state(RosterState::default()));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/role/MTO1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["role"], "mto");

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/role/X99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }
}
