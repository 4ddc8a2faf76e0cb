/// Entity collection path segments of the Crunchbase v4 lookup API.
pub const ORGANIZATIONS_ENTITY: &str = "organizations";
pub const PEOPLE_ENTITY: &str = "people";

/// Base URL for single-entity lookups; the collection segment and the
/// entity UUID are appended to form the request path.
pub const CRUNCHBASE_BASE_URL: &str = "https://api.crunchbase.com/api/v4/entities";

/// Header carrying the user API key on every request.
pub const API_KEY_HEADER: &str = "x-cb-user-key";

/// Environment variable the API key is read from.
pub const API_KEY_ENV: &str = "CBASE_API_KEY";
