use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub message: &'static str,
}

pub async fn health_check() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&Health { message: "Healthy" }))
}
