use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use log::debug;

use crate::auth::{self, Session};
use crate::user;

pub async fn authorize(
    auth_service: State<auth::Service>,
    user_service: State<user::Service>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> crate::Result<Response> {
    let sid = jar
        .get(Session::ID)
        .map(Session::from)
        .ok_or(auth::Error::Unauthorized)?;

    let Some(user_id) = auth_service.find_user_id(&sid).await else {
        debug!("No user bound to {sid:?}");
        return Err(auth::Error::Unauthorized.into());
    };

    let user = match user_service.find_by_id(&user_id).await {
        Ok(u) => u,
        Err(user::Error::NotFound(_)) => {
            debug!("{sid:?} points to a missing user");
            return Err(auth::Error::Unauthorized.into());
        }
        Err(e) => return Err(e.into()),
    };

    let auth_user = auth::User::from(user);
    debug!(
        "{sid:?} authorized as {}",
        auth_user.name().unwrap_or(auth_user.email().as_str())
    );
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}
