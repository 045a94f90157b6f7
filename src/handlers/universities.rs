use crate::db::universities::list_universities;
use crate::db::Database;
use crate::domain::university::ApiUniversity;
use crate::responses::{json_response, ResultResp};

pub fn list(db: &Database) -> ResultResp {
    let universities: Vec<ApiUniversity> = db
        .with_conn(|conn| list_universities(conn))?
        .iter()
        .map(|u| u.to_api())
        .collect();
    json_response(200, &universities)
}
