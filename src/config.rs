use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub mongo_max_pool_size: u32,
    pub mongo_timeout_secs: u64,
    pub questions_collection: String,
    pub categories_collection: String,
    pub exams_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "question-forge-local".to_string()),
            mongo_max_pool_size: env::var("MONGO_MAX_POOL_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
            mongo_timeout_secs: env::var("MONGO_TIMEOUT_SECS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            questions_collection: env::var("QUESTIONS_COLLECTION")
                .unwrap_or_else(|_| "questions".to_string()),
            categories_collection: env::var("CATEGORIES_COLLECTION")
                .unwrap_or_else(|_| "exam_categories".to_string()),
            exams_collection: env::var("EXAMS_COLLECTION").unwrap_or_else(|_| "exams".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }

    /// `*` switches the server to a permissive CORS policy.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origin.trim() == "*"
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "question-forge-test".to_string(),
            mongo_max_pool_size: 4,
            mongo_timeout_secs: 2,
            questions_collection: "questions".to_string(),
            categories_collection: "exam_categories".to_string(),
            exams_collection: "exams".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "*".to_string(),
        }
    }
}
