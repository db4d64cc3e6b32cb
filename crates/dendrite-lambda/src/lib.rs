mod response;

pub use response::LambdaResponse;
