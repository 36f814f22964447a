use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreedForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatForm {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub foods: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub breed: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatResponse {
    pub id: Uuid,
    pub nickname: String,
    pub foods: String,
    pub weight: String,
    pub breed_id: Uuid,
    pub breed_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatListResponse {
    pub cats: Vec<CatResponse>,
    pub breed_count: usize,
}
