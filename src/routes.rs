use crate::api::{attendance, employee};
use crate::config::Config;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::create_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/dashboard/summary
                    .service(
                        web::resource("/dashboard/summary")
                            .route(web::get().to(attendance::dashboard_summary)),
                    )
                    // /attendance/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::employee_attendance)),
                    )
                    // /attendance/summary/{employee_id}
                    .service(
                        web::resource("/summary/{employee_id}")
                            .route(web::get().to(attendance::employee_summary)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            ),
    );
}
