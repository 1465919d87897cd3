pub(super) const INSERT_USER: &str = r#"
    INSERT INTO users (
        user_id, name, email, gender,
        birth_day, birth_month, birth_year,
        country, region, latitude, longitude,
        push_token, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
"#;

pub(super) const SELECT_USER_BY_ID: &str = r#"
    SELECT user_id, name, email, gender,
           birth_day, birth_month, birth_year,
           country, region, latitude, longitude, push_token
    FROM users
    WHERE user_id = ?1
"#;

pub(super) const UPDATE_USER: &str = r#"
    UPDATE users
    SET name = ?2,
        email = ?3,
        gender = ?4,
        birth_day = ?5,
        birth_month = ?6,
        birth_year = ?7,
        country = ?8,
        region = ?9,
        latitude = ?10,
        longitude = ?11,
        push_token = ?12,
        updated_at = ?13
    WHERE user_id = ?1
"#;

pub(super) const SET_PUSH_TOKEN: &str = r#"
    UPDATE users
    SET push_token = ?2,
        updated_at = ?3
    WHERE user_id = ?1
"#;

pub(super) const INSERT_ITEM: &str = r#"
    INSERT INTO items (
        item_id, user_id, name, description,
        category, gender, size, fit, condition,
        min_price, last_price, current_price,
        images, country, region, latitude, longitude,
        delivery_methods, styles, keywords,
        view_count, like_count, fav_count, is_visible,
        created_at, updated_at
    ) VALUES (
        ?1, ?2, ?3, ?4,
        ?5, ?6, ?7, ?8, ?9,
        ?10, ?11, ?12,
        ?13, ?14, ?15, ?16, ?17,
        ?18, ?19, ?20,
        ?21, ?22, ?23, ?24,
        ?25, ?26
    )
"#;

// Counters and the price ladder are owned by the pricing/view statements;
// an owner edit must not clobber them.
pub(super) const UPDATE_ITEM: &str = r#"
    UPDATE items
    SET name = ?2,
        description = ?3,
        category = ?4,
        gender = ?5,
        size = ?6,
        fit = ?7,
        condition = ?8,
        images = ?9,
        country = ?10,
        region = ?11,
        latitude = ?12,
        longitude = ?13,
        delivery_methods = ?14,
        styles = ?15,
        keywords = ?16,
        is_visible = ?17,
        updated_at = ?18
    WHERE item_id = ?1
"#;

// Guarded: refuses to move the floor once any like is active again.
pub(super) const RESET_PRICE_FLOOR: &str = r#"
    UPDATE items
    SET min_price = ?2,
        last_price = ?2,
        current_price = ?2,
        updated_at = ?3
    WHERE item_id = ?1
      AND NOT EXISTS (
          SELECT 1 FROM interactions
          WHERE item_id = ?1 AND like_time IS NOT NULL
      )
"#;

pub(super) const DELETE_ITEM: &str = r#"
    DELETE FROM items
    WHERE item_id = ?1
"#;

pub(super) const SELECT_ITEM_BY_ID: &str = r#"
    SELECT * FROM items
    WHERE item_id = ?1
"#;

// Base of every viewer-enriched item select; the caller id is bound right
// after this fragment.
pub(super) const ITEMS_WITH_VIEWER_BASE: &str = r#"
    SELECT items.*,
           i.view_time AS viewer_view_time,
           i.like_time AS viewer_like_time,
           i.fav_time AS viewer_fav_time,
           i.like_price AS viewer_like_price
    FROM items
    LEFT JOIN interactions i
        ON i.item_id = items.item_id AND i.user_id = "#;

pub(super) const SELECT_ITEM_FOR_VIEWER: &str = r#"
    SELECT items.*,
           i.view_time AS viewer_view_time,
           i.like_time AS viewer_like_time,
           i.fav_time AS viewer_fav_time,
           i.like_price AS viewer_like_price
    FROM items
    LEFT JOIN interactions i
        ON i.item_id = items.item_id AND i.user_id = ?1
    WHERE items.item_id = ?2
      AND (items.is_visible = 1 OR items.user_id = ?1)
"#;

pub(super) const SELECT_ITEMS_BY_OWNER: &str = r#"
    SELECT items.*,
           i.view_time AS viewer_view_time,
           i.like_time AS viewer_like_time,
           i.fav_time AS viewer_fav_time,
           i.like_price AS viewer_like_price
    FROM items
    LEFT JOIN interactions i
        ON i.item_id = items.item_id AND i.user_id = ?1
    WHERE items.user_id = ?2
      AND (items.is_visible = 1 OR items.user_id = ?1)
    ORDER BY items.created_at DESC
"#;

pub(super) const SELECT_LIKED_ITEMS: &str = r#"
    SELECT items.*,
           i.view_time AS viewer_view_time,
           i.like_time AS viewer_like_time,
           i.fav_time AS viewer_fav_time,
           i.like_price AS viewer_like_price
    FROM items
    JOIN interactions i
        ON i.item_id = items.item_id AND i.user_id = ?1
    WHERE i.like_time IS NOT NULL
      AND (items.is_visible = 1 OR items.user_id = ?1)
    ORDER BY i.like_time DESC
"#;

pub(super) const UPSERT_VIEW: &str = r#"
    INSERT INTO interactions (user_id, item_id, view_time)
    VALUES (?1, ?2, ?3)
    ON CONFLICT (user_id, item_id) DO UPDATE SET
        view_time = excluded.view_time
"#;

pub(super) const INCREMENT_VIEW_COUNT: &str = r#"
    UPDATE items
    SET view_count = view_count + 1
    WHERE item_id = ?1
"#;

pub(super) const SELECT_ITEM_LADDER: &str = r#"
    SELECT user_id, name, images, min_price, last_price, current_price, is_visible
    FROM items
    WHERE item_id = ?1
"#;

pub(super) const SELECT_ACTIVE_LIKES: &str = r#"
    SELECT user_id, item_id, view_time, like_time, fav_time, like_price
    FROM interactions
    WHERE item_id = ?1 AND like_time IS NOT NULL
    ORDER BY like_price DESC, like_time ASC
"#;

pub(super) const SELECT_INTERACTION: &str = r#"
    SELECT user_id, item_id, view_time, like_time, fav_time, like_price
    FROM interactions
    WHERE user_id = ?1 AND item_id = ?2
"#;

// Conflict-resolving write keyed on (user_id, item_id): concurrent likes
// from one user race safely to a single row.
pub(super) const UPSERT_LIKE: &str = r#"
    INSERT INTO interactions (user_id, item_id, like_time, like_price)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (user_id, item_id) DO UPDATE SET
        like_time = excluded.like_time,
        like_price = excluded.like_price
"#;

pub(super) const CLEAR_LIKE: &str = r#"
    UPDATE interactions
    SET like_time = NULL,
        like_price = NULL
    WHERE user_id = ?1 AND item_id = ?2
"#;

pub(super) const APPLY_LIKE_TO_ITEM: &str = r#"
    UPDATE items
    SET last_price = ?2,
        current_price = ?3,
        like_count = like_count + 1
    WHERE item_id = ?1
"#;

pub(super) const APPLY_UNLIKE_TO_ITEM: &str = r#"
    UPDATE items
    SET last_price = ?2,
        current_price = ?3,
        like_count = max(like_count - 1, 0)
    WHERE item_id = ?1
"#;

pub(super) const UPSERT_FAVORITE: &str = r#"
    INSERT INTO interactions (user_id, item_id, fav_time)
    VALUES (?1, ?2, ?3)
    ON CONFLICT (user_id, item_id) DO UPDATE SET
        fav_time = excluded.fav_time
"#;

pub(super) const CLEAR_FAVORITE: &str = r#"
    UPDATE interactions
    SET fav_time = NULL
    WHERE user_id = ?1 AND item_id = ?2
"#;

pub(super) const BUMP_FAV_COUNT: &str = r#"
    UPDATE items
    SET fav_count = max(fav_count + ?2, 0)
    WHERE item_id = ?1
"#;

pub(super) const INSERT_OFFER: &str = r#"
    INSERT INTO offers (
        offer_id, from_id, to_id,
        from_payment, to_payment, offer_time
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub(super) const INSERT_OFFER_ITEM: &str = r#"
    INSERT INTO offer_items (offer_id, item_id)
    VALUES (?1, ?2)
"#;

pub(super) const SELECT_OFFER_BY_ID: &str = r#"
    SELECT * FROM offers
    WHERE offer_id = ?1
"#;

pub(super) const SELECT_OFFERS_WITH_USER: &str = r#"
    SELECT * FROM offers
    WHERE from_id = ?1 OR to_id = ?1
    ORDER BY offer_time DESC
"#;

pub(super) const SELECT_OFFERS_WITH_ITEM: &str = r#"
    SELECT offers.* FROM offers
    JOIN offer_items oi ON oi.offer_id = offers.offer_id
    WHERE oi.item_id = ?1
    ORDER BY offers.offer_time DESC
"#;

pub(super) const SELECT_OFFER_ITEM_IDS: &str = r#"
    SELECT item_id FROM offer_items
    WHERE offer_id = ?1
"#;

// Guarded on the pending state; zero rows updated means someone answered
// first.
pub(super) const RECORD_OFFER_RESPONSE: &str = r#"
    UPDATE offers
    SET response_type = ?2,
        response_time = ?3,
        exchange_id = ?4
    WHERE offer_id = ?1 AND response_type IS NULL
"#;

pub(super) const REJECT_FOR_COUNTER: &str = r#"
    UPDATE offers
    SET response_type = 'rejected',
        response_time = ?2,
        counter_offer_id = ?3
    WHERE offer_id = ?1 AND response_type IS NULL
"#;
