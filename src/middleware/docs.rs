//! API documentation stage.
//!
//! With the `docs` feature, `GET /docs` serves a Swagger UI page and
//! `GET /docs/openapi.yml` the OpenAPI description; every other request passes through.
//! Without it the stage leaves the router untouched.

use axum::Router;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/docs/openapi.yml";

#[cfg(feature = "docs")]
pub fn apply(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(serve::intercept))
}

#[cfg(not(feature = "docs"))]
pub fn apply(router: Router) -> Router {
    router
}

#[cfg(feature = "docs")]
mod serve {
    use axum::{
        extract::Request,
        http::{Method, header},
        middleware::Next,
        response::{Html, IntoResponse, Response},
    };
    use utoipa::OpenApi;

    use super::{DOCS_PATH, OPENAPI_PATH};
    use crate::api::v1::openapi::ApiDoc;
    use crate::error::AppError;

    const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Petstore API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/docs/openapi.yml", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

    pub(super) async fn intercept(req: Request, next: Next) -> Response {
        if req.method() != Method::GET {
            return next.run(req).await;
        }

        let path = req.uri().path();
        if path == DOCS_PATH {
            Html(SWAGGER_UI).into_response()
        } else if path == OPENAPI_PATH {
            openapi_yaml().into_response()
        } else {
            next.run(req).await
        }
    }

    fn openapi_yaml() -> Result<Response, AppError> {
        let yaml = ApiDoc::openapi()
            .to_yaml()
            .map_err(|e| AppError::internal(format!("render openapi: {e}")))?;

        Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response())
    }
}
