//! Role gate for admin-only routes. Must run after the auth gate.

use salvo::prelude::*;

use crate::extensions::*;

pub(crate) const NOT_AN_ADMIN: &str = "You are not an admin, you can't access this route";

#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let is_admin = match depot.identity_or_401() {
        Ok(user) => user.role.is_admin(),
        Err(rejection) => {
            res.render(rejection);
            ctrl.skip_rest();

            return;
        }
    };

    if !is_admin {
        res.render(StatusError::unauthorized().brief(NOT_AN_ADMIN));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
