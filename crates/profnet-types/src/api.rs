// -- Auth --

#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub handle: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub handle: String,
    pub password: String,
}
