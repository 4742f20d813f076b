pub mod clients;
pub mod gigs;
pub mod providers;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Client routes ──
    cfg.service(
        web::scope("/clients")
            .route("", web::post().to(clients::create_client))
            .route("/{id}", web::get().to(clients::get_client)),
    );

    // ── Provider routes ──
    cfg.service(
        web::scope("/providers")
            .route("", web::post().to(providers::create_provider))
            .route("/{id}", web::get().to(providers::get_provider)),
    );

    // ── Gig allocation routes ──
    // Literal segments are registered before the `{gig_id}` routes so
    // `/gigs/client/...` and friends never match as a gig id.
    cfg.service(
        web::scope("/gigs")
            .route("", web::post().to(gigs::create_gig))
            .route("/client/{client_id}", web::get().to(gigs::get_gigs_by_client))
            .route("/matches/{provider_id}", web::get().to(gigs::get_matches_for_provider))
            .route("/broadcast-offers/{provider_id}", web::get().to(gigs::get_broadcast_offers))
            .route("/{gig_id}", web::get().to(gigs::get_gig))
            .route("/{gig_id}/matched-providers", web::get().to(gigs::get_matched_providers))
            .route("/{gig_id}/select-provider", web::post().to(gigs::select_provider))
            .route("/{gig_id}/accept-direct-offer", web::post().to(gigs::accept_direct_offer))
            .route("/{gig_id}/decline-direct-offer", web::post().to(gigs::decline_direct_offer))
            .route("/{gig_id}/broadcast", web::post().to(gigs::broadcast))
            .route("/{gig_id}/accept-broadcast-offer", web::post().to(gigs::accept_broadcast_offer))
            .route("/{gig_id}/decline-broadcast-offer", web::post().to(gigs::decline_broadcast_offer))
            .route("/{gig_id}/status", web::get().to(gigs::get_status))
            .route("/{gig_id}/accept", web::put().to(gigs::accept)),
    );
}
