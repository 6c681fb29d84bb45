use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_limit(raw: &str, max: u64) -> Result<u64, ApiError> {
    let limit: u64 = raw.trim().parse().map_err(|_| {
        ApiError::validation(format!("Invalid limit: '{}'. Limit must be a number", raw))
    })?;

    if !(1..=max).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, max
        )));
    }
    Ok(limit)
}
