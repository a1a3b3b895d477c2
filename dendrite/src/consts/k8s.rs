//! Dendrite-specific Kubernetes definitions.

pub mod labels {
    //! Kubernetes labels used by Dendrite.

    /// The label selecting application pods, matched as `app=<name>`.
    pub const APP: &str = "app";
}

pub mod secret_keys {
    //! Well-known keys looked up in an application's Secret.

    /// A single connection URL, preferred over the discrete credentials
    /// below when both are present.
    pub const DATABASE_URL: &str = "DATABASE_URL";

    pub const DATABASE_NAME: &str = "DATABASE_NAME";
    pub const DATABASE_HOST: &str = "DATABASE_HOST";
    pub const DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";
    pub const DATABASE_PORT: &str = "DATABASE_PORT";
    pub const DATABASE_USER: &str = "DATABASE_USER";
}
