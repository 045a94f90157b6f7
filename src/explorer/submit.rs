use crate::domain::listing::{ApiListing, ListingInput};
use crate::explorer::client::{ClientError, ListingsBackend};
use crate::explorer::geocode::Geocoder;

/// Create a listing from a form draft.
///
/// Drafts without coordinates are geocoded from their address first. A failed
/// lookup is logged and the listing is saved without coordinates. Field-level
/// validation errors come back as `ClientError::Validation`.
pub fn submit_listing(
    backend: &dyn ListingsBackend,
    geocoder: &dyn Geocoder,
    draft: ListingInput,
) -> Result<ApiListing, ClientError> {
    let draft = if draft.has_coordinates() {
        draft
    } else {
        let query = draft.geocoding_query();
        if query.is_empty() {
            draft
        } else {
            match geocoder.geocode(&query) {
                Ok(at) => draft.with_coordinates(at),
                Err(e) => {
                    tracing::warn!(error = %e, %query, "geocoding failed; saving without coordinates");
                    draft
                }
            }
        }
    };

    let created = backend.create_listing(&draft);
    match &created {
        Ok(listing) => tracing::info!(id = listing.id, "listing created"),
        Err(ClientError::Validation(fields)) => {
            tracing::info!(%fields, "listing rejected by validation")
        }
        Err(e) => tracing::warn!(error = %e, "listing submission failed"),
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::Coordinates;
    use crate::domain::listing::Owner;
    use crate::domain::university::ApiUniversity;
    use crate::errors::FieldErrors;
    use crate::explorer::geocode::{GeocodeError, NoGeocoder};
    use std::cell::RefCell;

    #[derive(Default)]
    struct CapturingBackend {
        sent: RefCell<Vec<ListingInput>>,
        reject: bool,
    }

    impl ListingsBackend for CapturingBackend {
        fn fetch_listings(&self) -> Result<Vec<ApiListing>, ClientError> {
            Ok(Vec::new())
        }
        fn fetch_universities(&self) -> Result<Vec<ApiUniversity>, ClientError> {
            Ok(Vec::new())
        }
        fn create_listing(&self, input: &ListingInput) -> Result<ApiListing, ClientError> {
            self.sent.borrow_mut().push(input.clone());
            if self.reject {
                return Err(ClientError::Validation(FieldErrors::single(
                    "price",
                    "This field is required.",
                )));
            }
            Ok(ApiListing {
                id: 41,
                title: input.title.clone().unwrap_or_default(),
                price: input.price.clone().unwrap_or_default(),
                address: input.geocoding_query(),
                bedrooms: 1,
                bathrooms: 1.0,
                sqft: None,
                lat: input.lat.clone().flatten(),
                lng: input.lng.clone().flatten(),
                category: input.category.clone().unwrap_or_default(),
                description: String::new(),
                amenities: Vec::new(),
                owner: Owner::from_account(None, true),
                available: true,
                available_from: None,
                images: Vec::new(),
                image_url: String::new(),
            })
        }
    }

    struct FixedGeocoder(Coordinates);

    impl Geocoder for FixedGeocoder {
        fn geocode(&self, _query: &str) -> Result<Coordinates, GeocodeError> {
            Ok(self.0)
        }
    }

    fn draft() -> ListingInput {
        ListingInput {
            title: Some("Loft".into()),
            address: Some(Some("9301 Reseda Blvd".into())),
            city: Some("Northridge".into()),
            state: Some("CA".into()),
            price: Some("1500".into()),
            ..ListingInput::default()
        }
    }

    #[test]
    fn geocodes_address_before_posting() {
        let backend = CapturingBackend::default();
        let geocoder = FixedGeocoder(Coordinates::new(34.2231, -118.5362));
        let created = submit_listing(&backend, &geocoder, draft()).unwrap();
        assert_eq!(created.lat.as_deref(), Some("34.223100"));
        assert_eq!(backend.sent.borrow()[0].lng, Some(Some("-118.536200".to_string())));
    }

    #[test]
    fn geocode_failure_still_submits() {
        let backend = CapturingBackend::default();
        let created = submit_listing(&backend, &NoGeocoder, draft()).unwrap();
        assert_eq!(created.lat, None);
        assert_eq!(backend.sent.borrow().len(), 1);
    }

    #[test]
    fn explicit_coordinates_skip_geocoding() {
        let backend = CapturingBackend::default();
        let geocoder = FixedGeocoder(Coordinates::new(0.0, 0.0));
        let d = draft().with_coordinates(Coordinates::new(34.0, -118.0));
        submit_listing(&backend, &geocoder, d).unwrap();
        assert_eq!(backend.sent.borrow()[0].lat, Some(Some("34.000000".to_string())));
    }

    #[test]
    fn validation_errors_surface_per_field() {
        let backend = CapturingBackend {
            reject: true,
            ..CapturingBackend::default()
        };
        match submit_listing(&backend, &NoGeocoder, draft()) {
            Err(ClientError::Validation(fields)) => assert!(fields.get("price").is_some()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
