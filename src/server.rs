use std::{
    io::Result,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use actix_cors::Cors;
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{from_fn, DefaultHeaders, Logger, Next},
    web::{self, resource, scope, Json},
    App, HttpRequest, HttpResponse, HttpServer, ResponseError,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    contact::ContactSubmission,
    core::{data, settings::Settings},
    error::ApiError,
    mail::{MailError, Mailer},
    rate_limit::RateLimiter,
    types::{HealthResponse, MessageResponse, ProjectsResponse, ServicesResponse},
};

const JSON_LIMIT: usize = 10 * 1024 * 1024;
pub const CONTACT_SUCCESS_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

/// State shared by every worker.
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub contact_limiter: RateLimiter,
    pub global_limiter: RateLimiter,
    pub trust_proxy: bool,
}

impl AppState {
    pub fn new(settings: &Settings, mailer: Arc<dyn Mailer>) -> Self {
        AppState {
            mailer,
            contact_limiter: RateLimiter::new(&settings.contact_limit),
            global_limiter: RateLimiter::new(&settings.global_limit),
            trust_proxy: settings.trust_proxy,
        }
    }
}

pub async fn start_server(settings: Settings, mailer: Arc<dyn Mailer>) -> Result<()> {
    let state = web::Data::new(AppState::new(&settings, mailer));
    let addr = settings.addr();

    let server = HttpServer::new(move || build_app(state.clone(), &settings)).bind(addr)?;
    tracing::info!("Server is running on {}", addr);
    server.run().await
}

/// The full application: routes plus the rate-limit, security-header,
/// access-log and CORS middleware, innermost first.
pub fn build_app(
    state: web::Data<AppState>,
    settings: &Settings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    App::new()
        .app_data(state)
        .configure(configure)
        .wrap(from_fn(global_rate_limit))
        .wrap(security_headers())
        .wrap(Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %T"))
        .wrap(cors(settings))
}

/// Registers the API routes, body limits and the 404 fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|error, _req| {
                tracing::warn!("Rejected request body: {}", error);
                ApiError::BadRequest("Invalid request body".to_string()).into()
            }),
    )
    .service(
        scope("/api")
            .service(
                resource("/health")
                    .route(web::get().to(health_handler))
                    .default_service(web::to(not_found_handler)),
            )
            .service(
                resource("/projects")
                    .route(web::get().to(projects_handler))
                    .default_service(web::to(not_found_handler)),
            )
            .service(
                resource("/services")
                    .route(web::get().to(services_handler))
                    .default_service(web::to(not_found_handler)),
            )
            .service(
                resource("/contact")
                    .route(web::post().to(contact_handler))
                    .default_service(web::to(not_found_handler)),
            ),
    )
    .default_service(web::to(not_found_handler));
}

fn cors(settings: &Settings) -> Cors {
    match &settings.cors_allowed_origins {
        None => Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method(),
        Some(origins) => origins.iter().fold(
            Cors::default().allow_any_header().allow_any_method(),
            |cors, origin| cors.allowed_origin(origin),
        ),
    }
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
}

/// Rejects clients that exceed the app-wide request budget.
pub async fn global_rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> std::result::Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    let limited = req.app_data::<web::Data<AppState>>().and_then(|state| {
        let client = client_ip(req.request(), state.trust_proxy);
        if state.global_limiter.check(client) {
            None
        } else {
            tracing::warn!(%client, "Global rate limit exceeded");
            Some(state.global_limiter.message())
        }
    });

    if let Some(message) = limited {
        let response = ApiError::RateLimited(message).error_response();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

/// Address used as the rate-limit key for a request.
pub fn client_ip(req: &HttpRequest, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let info = req.connection_info();
        if let Some(ip) = info.realip_remote_addr().and_then(parse_ip) {
            return ip;
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    let value = value.trim();
    value
        .parse::<IpAddr>()
        .ok()
        .or_else(|| value.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
        .or_else(|| {
            value
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .ok()
        })
}

async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

async fn projects_handler() -> HttpResponse {
    HttpResponse::Ok().json(ProjectsResponse {
        success: true,
        projects: data::projects(),
    })
}

async fn services_handler() -> HttpResponse {
    HttpResponse::Ok().json(ServicesResponse {
        success: true,
        services: data::services(),
    })
}

async fn contact_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    submission: Json<ContactSubmission>,
) -> std::result::Result<HttpResponse, ApiError> {
    let client = client_ip(&req, state.trust_proxy);
    if !state.contact_limiter.check(client) {
        tracing::warn!(%client, "Contact form rate limit exceeded");
        return Err(ApiError::RateLimited(state.contact_limiter.message()));
    }

    let contact = submission.into_inner().into_valid().map_err(|errors| {
        tracing::info!(%client, rejected = errors.len(), "Contact form failed validation");
        ApiError::Validation(errors)
    })?;

    let (Some(from), Some(to)) = (state.mailer.sender(), state.mailer.recipient()) else {
        return Err(MailError::NotConfigured.into());
    };

    let reference = Uuid::new_v4();
    let mail = contact.to_mail(from, to, reference, Utc::now());
    state.mailer.send(&mail).await?;

    tracing::info!(%reference, %client, "Contact form message relayed");
    Ok(HttpResponse::Ok().json(MessageResponse::ok(CONTACT_SUCCESS_MESSAGE)))
}

async fn not_found_handler() -> std::result::Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
