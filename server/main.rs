use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use std::env;

/// Base path the bundle is served under; must match the router base in the app.
const BASE_PATH: &str = "/bus-atlas";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    println!("Starting server on 0.0.0.0:{port}{BASE_PATH}");

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(redirect_to_base))
            .service(
                Files::new(BASE_PATH, "./dist")
                    .index_file("index.html")
                    // Deep links like /bus-atlas/maps are resolved client-side
                    .default_handler(fn_service(|req: ServiceRequest| async {
                        let (req, _) = req.into_parts();
                        let file = NamedFile::open_async("./dist/index.html").await?;
                        let res = file.into_response(&req);
                        Ok(ServiceResponse::new(req, res))
                    })),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn redirect_to_base() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, BASE_PATH))
        .finish()
}
