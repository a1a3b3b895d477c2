mod secret;

pub use self::secret::SecretExt;
